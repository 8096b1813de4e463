//! Local webhook fulfillment command implementation: one request on stdin,
//! one response on stdout.
use std::sync::Arc;
use tokio::io::{self, AsyncReadExt};

use crate::{
    cli,
    error::Result,
    forge::github::Github,
    orchestrator::Orchestrator,
    webhook::{IntentHandler, WebhookRequest},
};

/// Execute the handle command: parse a fulfillment request from stdin, run it
/// through the intent handler, and print the response JSON.
pub async fn execute(args: &cli::Args) -> Result<()> {
    let approved_user = args.approved_user()?;
    let config = args.github_config()?;
    let github = Arc::new(Github::new(config)?);

    let orchestrator =
        Orchestrator::new(github.clone(), github.clone(), github);
    let handler = IntentHandler::new(orchestrator, approved_user);

    let mut input = String::new();
    io::stdin().read_to_string(&mut input).await?;

    let request: WebhookRequest = serde_json::from_str(&input)?;
    let response = handler.handle(&request).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
