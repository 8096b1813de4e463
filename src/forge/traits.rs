//! Traits for the external collaborators of the release pipeline.
//!
//! The orchestrator only ever talks to these three capabilities; the GitHub
//! adapter implements all of them on one client. Mock implementations are
//! generated for tests so the pipeline is testable without network access.
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::types::{CreateReleaseRequest, Published, PullRequest, Repository},
};

/// Fetches the caller's accessible repositories, ordered most-recently-updated
/// first, each carrying up to one most-recent published release.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepositoryCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Repository>>;
}

/// Fetches pull requests merged into a repository's default branch after the
/// given release tag.
///
/// Contract: when `tag` is [`crate::forge::types::NO_RELEASE_SENTINEL`] the
/// source returns an empty list without making the underlying query.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChangelogSource: Send + Sync {
    async fn fetch_merged_since(
        &self,
        full_name: &str,
        tag: &str,
    ) -> Result<Vec<PullRequest>>;
}

/// Publishes a tagged release, reporting tag-already-exists as a distinct
/// non-fatal outcome.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReleasePublisher: Send + Sync {
    async fn create(&self, req: CreateReleaseRequest) -> Result<Published>;
}
