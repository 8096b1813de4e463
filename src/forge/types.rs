//! Shared data types for repositories, pull requests, and release publication.
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use semver::Version;

use crate::error::{HeraldError, Result};

/// Tag value passed to [`crate::forge::traits::ChangelogSource`] when a
/// repository has no prior release. The source must return an empty list
/// without querying upstream.
pub const NO_RELEASE_SENTINEL: &str = "0.0.0";

static TAG_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v").unwrap());

/// Most recent published release of a repository.
#[derive(Debug, Clone)]
pub struct LatestRelease {
    /// Git tag name of the release (may carry a leading "v").
    pub tag: String,
    /// When the release was published. Authoritative boundary for the
    /// merged-pull-request filter.
    pub published_at: DateTime<Utc>,
}

/// Repository snapshot fetched fresh for a single orchestration run.
#[derive(Debug, Clone)]
pub struct Repository {
    pub id: String,
    /// Short name, the fuzzy-match target.
    pub name: String,
    /// "owner/name" form used for API calls.
    pub full_name: String,
    /// None means the repository has never published a release.
    pub latest_release: Option<LatestRelease>,
}

impl Repository {
    /// Split `full_name` into its owner and repo components.
    pub fn owner_and_name(&self) -> Result<(&str, &str)> {
        split_full_name(&self.full_name)
    }

    /// Version of the latest release, or 0.0.0 when none exists. A
    /// repository without releases is legal input, not an error.
    pub fn current_version(&self) -> Result<Version> {
        match &self.latest_release {
            Some(latest) => parse_tag_version(&latest.tag),
            None => Ok(Version::new(0, 0, 0)),
        }
    }
}

/// Split an "owner/name" path into its two components.
pub fn split_full_name(full_name: &str) -> Result<(&str, &str)> {
    full_name.split_once('/').ok_or_else(|| {
        HeraldError::forge(format!(
            "malformed repository full name: {full_name}"
        ))
    })
}

/// Parse a release tag into a semantic version, tolerating a leading "v".
pub fn parse_tag_version(tag: &str) -> Result<Version> {
    let stripped = TAG_PREFIX_RE.replace(tag, "");
    Ok(Version::parse(&stripped)?)
}

/// Pull request merged into a repository's default branch.
#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub merged_at: DateTime<Utc>,
    pub author_login: String,
    pub author_url: String,
    pub html_url: String,
}

#[derive(Debug, Clone)]
/// Request to publish a tagged release.
pub struct CreateReleaseRequest {
    pub owner: String,
    pub repo: String,
    pub tag_name: String,
    pub release_name: String,
    pub body: String,
}

/// Outcome of a release publication.
///
/// `AlreadyExists` keeps re-invocation per `(repo, tag)` idempotent: a
/// duplicate publish surfaces the existing release instead of failing or
/// creating a second tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Created { url: String },
    AlreadyExists { url: String },
}

impl Published {
    pub fn url(&self) -> &str {
        match self {
            Published::Created { url } => url,
            Published::AlreadyExists { url } => url,
        }
    }
}
