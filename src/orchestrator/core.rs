//! End-to-end release pipeline.
use std::sync::Arc;

use log::*;
use semver::Version;

use crate::{
    error::{HeraldError, Result},
    forge::{
        traits::{ChangelogSource, ReleasePublisher, RepositoryCatalog},
        types::{CreateReleaseRequest, Published, PullRequest, Repository},
    },
    orchestrator::{changelog, resolver, version::VersionBump},
};

/// Minimum resolver confidence to act on a match. Strictly below this the
/// caller is asked to pick from the catalog instead.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Terminal result of one successful release run.
#[derive(Debug, Clone)]
pub struct ReleaseResult {
    pub owner: String,
    pub repo: String,
    pub previous_version: Version,
    pub next_version: Version,
    pub release_name: String,
    pub url: String,
}

/// Composes the catalog, changelog source, and publisher into the release
/// flow: resolve, determine current version, collect merged pull requests,
/// compute the next version, render the changelog, publish, report.
///
/// Holds no mutable state; concurrent runs only share the underlying API
/// clients.
pub struct Orchestrator {
    catalog: Arc<dyn RepositoryCatalog>,
    changelog: Arc<dyn ChangelogSource>,
    publisher: Arc<dyn ReleasePublisher>,
}

impl Orchestrator {
    pub fn new(
        catalog: Arc<dyn RepositoryCatalog>,
        changelog: Arc<dyn ChangelogSource>,
        publisher: Arc<dyn ReleasePublisher>,
    ) -> Self {
        Self {
            catalog,
            changelog,
            publisher,
        }
    }

    /// Publish the next release of the repository best matching `free_text`.
    ///
    /// Fails with [`HeraldError::NoRepositoriesFound`] when the caller has no
    /// repositories, [`HeraldError::InsufficientCertainty`] when no name
    /// matches well enough, and [`HeraldError::CreateRelease`] when the
    /// publish call is rejected. Anything else propagates as-is for the
    /// presentation layer to log.
    pub async fn create_release(
        &self,
        bump: VersionBump,
        free_text: &str,
    ) -> Result<ReleaseResult> {
        let repositories = self.catalog.fetch_all().await?;

        if repositories.is_empty() {
            return Err(HeraldError::NoRepositoriesFound);
        }

        let matched = resolver::resolve(free_text, &repositories);

        debug!(
            "best match for \"{free_text}\": {} (confidence {:.3})",
            matched.candidate.name, matched.confidence
        );

        if matched.confidence < CONFIDENCE_THRESHOLD {
            return Err(HeraldError::InsufficientCertainty {
                input: free_text.to_string(),
                candidates: repositories
                    .iter()
                    .map(|r| r.name.clone())
                    .collect(),
            });
        }

        let repository = matched.candidate.clone();
        let current_version = repository.current_version()?;
        let pull_requests = self.merged_pull_requests(&repository).await?;

        let next_version = bump.apply(&current_version);
        let body = changelog::render(&pull_requests);
        let release_name = format!("Release {next_version}");
        let (owner, repo) = repository.owner_and_name()?;

        info!(
            "publishing {owner}/{repo}: {current_version} -> {next_version} with {} changelog entries",
            pull_requests.len()
        );

        let published = self
            .publisher
            .create(CreateReleaseRequest {
                owner: owner.to_string(),
                repo: repo.to_string(),
                tag_name: next_version.to_string(),
                release_name: release_name.clone(),
                body,
            })
            .await?;

        if let Published::AlreadyExists { .. } = &published {
            warn!(
                "tag {next_version} already exists for {owner}/{repo}: reporting the existing release"
            );
        }

        Ok(ReleaseResult {
            owner: owner.to_string(),
            repo: repo.to_string(),
            previous_version: current_version,
            next_version,
            release_name,
            url: published.url().to_string(),
        })
    }

    /// Pull requests merged since the latest release, oldest first.
    ///
    /// A repository without a prior release has no boundary to query against,
    /// so the fetch is skipped entirely. The upstream tag-based query is only
    /// a pre-filter; the release publish timestamp is the authoritative
    /// boundary.
    async fn merged_pull_requests(
        &self,
        repository: &Repository,
    ) -> Result<Vec<PullRequest>> {
        let Some(latest) = &repository.latest_release else {
            return Ok(vec![]);
        };

        let mut pull_requests = self
            .changelog
            .fetch_merged_since(&repository.full_name, &latest.tag)
            .await?;

        pull_requests.retain(|pr| pr.merged_at > latest.published_at);
        pull_requests.sort_by_key(|pr| pr.merged_at);

        Ok(pull_requests)
    }
}
