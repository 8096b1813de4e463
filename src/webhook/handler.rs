//! Maps fulfillment requests onto the release pipeline and pipeline outcomes
//! onto spoken responses.
use log::*;

use crate::{
    error::HeraldError,
    orchestrator::{Orchestrator, VersionBump},
    webhook::types::{WebhookRequest, WebhookResponse},
};

/// Intent name the voice agent sends for release requests.
pub const RELEASE_INTENT: &str = "Release";

/// Suggestion chip offered whenever the conversation stays open.
const RELEASE_SUGGESTION: &str = "Release";

/// The only caller of [`Orchestrator::create_release`]: authorizes the
/// caller, validates parameters before any network call, and turns every
/// outcome into a spoken response.
pub struct IntentHandler {
    orchestrator: Orchestrator,
    approved_user: String,
}

impl IntentHandler {
    pub fn new(
        orchestrator: Orchestrator,
        approved_user: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            approved_user: approved_user.into(),
        }
    }

    /// Handle one fulfillment request. Never fails: every error kind has a
    /// spoken rendering.
    pub async fn handle(&self, request: &WebhookRequest) -> WebhookResponse {
        if request.user_id() != Some(self.approved_user.as_str()) {
            return WebhookResponse::close(
                "You are not allowed to perform this action!",
            );
        }

        if request.intent_name() != RELEASE_INTENT {
            return WebhookResponse::close(
                "I can only help with publishing releases.",
            );
        }

        let repository = request.repository().trim();

        if repository.is_empty() {
            return WebhookResponse::ask(
                "Which repository should I release?",
                vec![RELEASE_SUGGESTION.to_string()],
            );
        }

        // reject a bad bump keyword before spending any API calls
        let bump: VersionBump = match request.version().parse() {
            Ok(bump) => bump,
            Err(_) => {
                return WebhookResponse::ask(
                    "Should that be a major, minor, or patch release?",
                    vec![RELEASE_SUGGESTION.to_string()],
                );
            }
        };

        match self.orchestrator.create_release(bump, repository).await {
            Ok(result) => WebhookResponse::close(format!(
                "{}/{} released from {} to {}.",
                result.owner,
                result.repo,
                result.previous_version,
                result.next_version
            )),
            Err(HeraldError::NoRepositoriesFound) => WebhookResponse::close(
                "It seems that you don't have any repositories.",
            ),
            Err(HeraldError::InsufficientCertainty { candidates, .. }) => {
                WebhookResponse::ask(
                    format!(
                        "I couldn't find that repository. I found the following: {}.",
                        candidates.join(", ")
                    ),
                    vec![RELEASE_SUGGESTION.to_string()],
                )
            }
            Err(HeraldError::CreateRelease(reason)) => {
                error!("release creation rejected: {reason}");
                WebhookResponse::ask(
                    "Sorry, I failed to create the release.",
                    vec![RELEASE_SUGGESTION.to_string()],
                )
            }
            Err(err) => {
                error!("release request failed: {err}");
                WebhookResponse::ask(
                    "Sorry, something went wrong creating the release.",
                    vec![RELEASE_SUGGESTION.to_string()],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::forge::{
        traits::{
            MockChangelogSource, MockReleasePublisher, MockRepositoryCatalog,
        },
        types::{LatestRelease, Published, Repository},
    };

    const APPROVED_USER: &str = "user-1";

    fn release_request(
        user_id: Option<&str>,
        repository: &str,
        version: &str,
    ) -> WebhookRequest {
        let mut request = WebhookRequest::default();

        request.query_result.intent.display_name = RELEASE_INTENT.to_string();
        request.query_result.parameters.repository = repository.to_string();
        request.query_result.parameters.version = version.to_string();
        request.original_detect_intent_request.payload.user.user_id =
            user_id.map(String::from);

        request
    }

    fn handler_with(
        catalog: MockRepositoryCatalog,
        changelog: MockChangelogSource,
        publisher: MockReleasePublisher,
    ) -> IntentHandler {
        let orchestrator = Orchestrator::new(
            Arc::new(catalog),
            Arc::new(changelog),
            Arc::new(publisher),
        );
        IntentHandler::new(orchestrator, APPROVED_USER)
    }

    fn untouched_mocks()
    -> (MockRepositoryCatalog, MockChangelogSource, MockReleasePublisher)
    {
        let mut catalog = MockRepositoryCatalog::new();
        catalog.expect_fetch_all().times(0);

        let mut changelog = MockChangelogSource::new();
        changelog.expect_fetch_merged_since().times(0);

        let mut publisher = MockReleasePublisher::new();
        publisher.expect_create().times(0);

        (catalog, changelog, publisher)
    }

    #[tokio::test]
    async fn unauthorized_caller_is_closed_without_any_network_call() {
        let (catalog, changelog, publisher) = untouched_mocks();
        let handler = handler_with(catalog, changelog, publisher);

        let request = release_request(Some("intruder"), "widget api", "patch");
        let response = handler.handle(&request).await;

        assert!(!response.expect_user_response);
        assert_eq!(
            response.fulfillment_text,
            "You are not allowed to perform this action!"
        );
    }

    #[tokio::test]
    async fn missing_caller_identity_is_unauthorized() {
        let (catalog, changelog, publisher) = untouched_mocks();
        let handler = handler_with(catalog, changelog, publisher);

        let request = release_request(None, "widget api", "patch");
        let response = handler.handle(&request).await;

        assert!(!response.expect_user_response);
    }

    #[tokio::test]
    async fn invalid_bump_keyword_reasks_before_any_network_call() {
        let (catalog, changelog, publisher) = untouched_mocks();
        let handler = handler_with(catalog, changelog, publisher);

        let request =
            release_request(Some(APPROVED_USER), "widget api", "gigantic");
        let response = handler.handle(&request).await;

        assert!(response.expect_user_response);
        assert!(response.fulfillment_text.contains("major, minor, or patch"));
        assert_eq!(response.suggestions, vec!["Release"]);
    }

    #[tokio::test]
    async fn missing_repository_parameter_reasks() {
        let (catalog, changelog, publisher) = untouched_mocks();
        let handler = handler_with(catalog, changelog, publisher);

        let request = release_request(Some(APPROVED_USER), "  ", "patch");
        let response = handler.handle(&request).await;

        assert!(response.expect_user_response);
        assert!(response.fulfillment_text.contains("Which repository"));
    }

    #[tokio::test]
    async fn successful_release_closes_with_versions() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let mut catalog = MockRepositoryCatalog::new();
        catalog.expect_fetch_all().times(1).returning(move || {
            Ok(vec![Repository {
                id: "r1".into(),
                name: "widget-api".into(),
                full_name: "octo/widget-api".into(),
                latest_release: Some(LatestRelease {
                    tag: "2.0.0".into(),
                    published_at: t0,
                }),
            }])
        });

        let mut changelog = MockChangelogSource::new();
        changelog
            .expect_fetch_merged_since()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let mut publisher = MockReleasePublisher::new();
        publisher.expect_create().times(1).returning(|_| {
            Ok(Published::Created {
                url: "https://github.com/octo/widget-api/releases/tag/2.0.1"
                    .to_string(),
            })
        });

        let handler = handler_with(catalog, changelog, publisher);

        let request =
            release_request(Some(APPROVED_USER), "widgt api", "patch");
        let response = handler.handle(&request).await;

        assert!(!response.expect_user_response);
        assert_eq!(
            response.fulfillment_text,
            "octo/widget-api released from 2.0.0 to 2.0.1."
        );
    }

    #[tokio::test]
    async fn no_repositories_closes_with_terminal_message() {
        let mut catalog = MockRepositoryCatalog::new();
        catalog.expect_fetch_all().times(1).returning(|| Ok(vec![]));

        let mut changelog = MockChangelogSource::new();
        changelog.expect_fetch_merged_since().times(0);

        let mut publisher = MockReleasePublisher::new();
        publisher.expect_create().times(0);

        let handler = handler_with(catalog, changelog, publisher);

        let request =
            release_request(Some(APPROVED_USER), "widget api", "patch");
        let response = handler.handle(&request).await;

        assert!(!response.expect_user_response);
        assert!(response.fulfillment_text.contains("don't have any"));
    }

    #[tokio::test]
    async fn uncertain_match_lists_all_candidates_and_reasks() {
        let mut catalog = MockRepositoryCatalog::new();
        catalog.expect_fetch_all().times(1).returning(|| {
            Ok(vec![
                Repository {
                    id: "r1".into(),
                    name: "alpha".into(),
                    full_name: "octo/alpha".into(),
                    latest_release: None,
                },
                Repository {
                    id: "r2".into(),
                    name: "beta".into(),
                    full_name: "octo/beta".into(),
                    latest_release: None,
                },
            ])
        });

        let mut changelog = MockChangelogSource::new();
        changelog.expect_fetch_merged_since().times(0);

        let mut publisher = MockReleasePublisher::new();
        publisher.expect_create().times(0);

        let handler = handler_with(catalog, changelog, publisher);

        let request = release_request(Some(APPROVED_USER), "zzz", "major");
        let response = handler.handle(&request).await;

        assert!(response.expect_user_response);
        assert!(response.fulfillment_text.contains("alpha, beta"));
        assert_eq!(response.suggestions, vec!["Release"]);
    }

    #[tokio::test]
    async fn unexpected_failure_reasks_with_generic_message() {
        let mut catalog = MockRepositoryCatalog::new();
        catalog
            .expect_fetch_all()
            .times(1)
            .returning(|| Err(HeraldError::RateLimitExceeded));

        let mut changelog = MockChangelogSource::new();
        changelog.expect_fetch_merged_since().times(0);

        let mut publisher = MockReleasePublisher::new();
        publisher.expect_create().times(0);

        let handler = handler_with(catalog, changelog, publisher);

        let request =
            release_request(Some(APPROVED_USER), "widget api", "patch");
        let response = handler.handle(&request).await;

        assert!(response.expect_user_response);
        assert!(response.fulfillment_text.contains("something went wrong"));
    }

    #[tokio::test]
    async fn unknown_intent_is_closed() {
        let (catalog, changelog, publisher) = untouched_mocks();
        let handler = handler_with(catalog, changelog, publisher);

        let mut request =
            release_request(Some(APPROVED_USER), "widget api", "patch");
        request.query_result.intent.display_name = "Weather".to_string();

        let response = handler.handle(&request).await;

        assert!(!response.expect_user_response);
    }
}
