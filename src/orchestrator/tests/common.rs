//! Common test utilities for orchestrator tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    forge::{
        traits::{
            MockChangelogSource, MockReleasePublisher, MockRepositoryCatalog,
        },
        types::{LatestRelease, PullRequest, Repository},
    },
    orchestrator::Orchestrator,
};

/// Fixed timestamp helper so boundary comparisons are deterministic.
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn repository(
    name: &str,
    latest_release: Option<LatestRelease>,
) -> Repository {
    Repository {
        id: format!("repo-{name}"),
        name: name.to_string(),
        full_name: format!("octo/{name}"),
        latest_release,
    }
}

pub fn released(tag: &str, published_at: DateTime<Utc>) -> LatestRelease {
    LatestRelease {
        tag: tag.to_string(),
        published_at,
    }
}

pub fn pull_request(
    number: u64,
    title: &str,
    merged_at: DateTime<Utc>,
) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        merged_at,
        author_login: "octocat".to_string(),
        author_url: "https://github.com/octocat".to_string(),
        html_url: format!("https://github.com/octo/widget-api/pull/{number}"),
    }
}

/// Creates an Orchestrator over the provided mocks. Set expectations on the
/// mocks before calling.
pub fn create_test_orchestrator(
    catalog: MockRepositoryCatalog,
    changelog: MockChangelogSource,
    publisher: MockReleasePublisher,
) -> Orchestrator {
    Orchestrator::new(
        Arc::new(catalog),
        Arc::new(changelog),
        Arc::new(publisher),
    )
}
