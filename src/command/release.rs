//! Direct release publication command implementation.
use log::*;
use std::sync::Arc;

use crate::{
    cli,
    error::Result,
    forge::github::Github,
    orchestrator::{Orchestrator, VersionBump},
};

/// Execute the release command: resolve the named repository and publish its
/// next release.
pub async fn execute(
    args: &cli::Args,
    repo: &str,
    bump: VersionBump,
) -> Result<()> {
    let config = args.github_config()?;
    let github = Arc::new(Github::new(config)?);

    let orchestrator =
        Orchestrator::new(github.clone(), github.clone(), github);

    let result = orchestrator.create_release(bump, repo).await?;

    info!(
        "released {}/{}: {} -> {}",
        result.owner, result.repo, result.previous_version, result.next_version
    );
    info!("release url: {}", result.url);

    Ok(())
}
