//! Serverless webhook entrypoint: receives fulfillment requests as JSON
//! events and answers with spoken responses.
#[cfg(feature = "lambda")]
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
#[cfg(feature = "lambda")]
use secrecy::SecretString;
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
use release_herald::{
    forge::{config::GithubConfig, github::Github},
    orchestrator::Orchestrator,
    webhook::{IntentHandler, WebhookRequest, WebhookResponse},
};

#[cfg(feature = "lambda")]
async fn function_handler(
    event: LambdaEvent<WebhookRequest>,
) -> Result<WebhookResponse, Error> {
    let token = std::env::var("GITHUB_TOKEN")
        .map_err(|_| Error::from("GITHUB_TOKEN must be set"))?;
    let approved_user = std::env::var("APPROVED_USER_ID")
        .map_err(|_| Error::from("APPROVED_USER_ID must be set"))?;

    let config = GithubConfig {
        token: SecretString::from(token),
        ..GithubConfig::default()
    };

    let github = Arc::new(Github::new(config)?);
    let orchestrator =
        Orchestrator::new(github.clone(), github.clone(), github);
    let handler = IntentHandler::new(orchestrator, approved_user);

    Ok(handler.handle(&event.payload).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_herald")
        .build();

    simplelog::SimpleLogger::init(simplelog::LevelFilter::Info, config)?;

    run(service_fn(function_handler)).await
}
