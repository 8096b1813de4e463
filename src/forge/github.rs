//! Implements the collaborator traits against the GitHub API.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::cmp;

const REPOSITORIES_QUERY: &str = r#"
query Repositories($page_limit: Int!) {
  viewer {
    repositories(first: $page_limit, affiliations: [OWNER, COLLABORATOR, ORGANIZATION_MEMBER], orderBy: {field: UPDATED_AT, direction: DESC}) {
      nodes {
        id
        name
        nameWithOwner
        releases(first: 1, orderBy: {field: CREATED_AT, direction: DESC}) {
          nodes {
            publishedAt
            tag {
              name
            }
          }
        }
      }
    }
  }
}"#;

const MERGED_PRS_QUERY: &str = r#"
query MergedPullRequests($owner: String!, $repo: String!, $page_limit: Int!, $cursor: String) {
  repository(owner: $owner, name: $repo) {
    defaultBranchRef {
      name
    }
    pullRequests(states: [MERGED], first: $page_limit, after: $cursor, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        number
        title
        mergedAt
        url
        baseRefName
        author {
          login
          url
        }
      }
    }
  }
}"#;

const TAG_DATE_QUERY: &str = r#"
query TagDate($owner: String!, $repo: String!, $ref: String!) {
  repository(owner: $owner, name: $repo) {
    ref(qualifiedName: $ref) {
      target {
        ... on Commit {
          committedDate
        }
        ... on Tag {
          target {
            ... on Commit {
              committedDate
            }
          }
        }
      }
    }
  }
}"#;

use crate::{
    error::{HeraldError, Result},
    forge::{
        config::{DEFAULT_PAGE_SIZE, GithubConfig},
        traits::{ChangelogSource, ReleasePublisher, RepositoryCatalog},
        types::{
            CreateReleaseRequest, LatestRelease, NO_RELEASE_SENTINEL,
            Published, PullRequest, Repository, split_full_name,
        },
    },
};

#[derive(Debug, Deserialize)]
struct ReleaseTagNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseNode {
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub tag: Option<ReleaseTagNode>,
}

#[derive(Debug, Deserialize)]
struct ReleasesConnection {
    pub nodes: Vec<ReleaseNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "nameWithOwner")]
    pub name_with_owner: String,
    pub releases: ReleasesConnection,
}

#[derive(Debug, Deserialize)]
struct RepositoriesConnection {
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoriesViewer {
    pub repositories: RepositoriesConnection,
}

#[derive(Debug, Deserialize)]
struct RepositoriesData {
    pub viewer: RepositoriesViewer,
}

#[derive(Debug, Deserialize)]
struct RepositoriesResult {
    pub data: RepositoriesData,
}

#[derive(Debug, Serialize)]
struct RepositoriesVariables {
    pub page_limit: u64,
}

#[derive(Debug, Deserialize)]
struct PullRequestAuthor {
    pub login: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestNode {
    pub number: u64,
    pub title: String,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<String>,
    pub url: String,
    #[serde(rename = "baseRefName")]
    pub base_ref_name: String,
    pub author: Option<PullRequestAuthor>,
}

#[derive(Debug, Deserialize)]
struct QueryPageInfo {
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "endCursor")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestsConnection {
    pub nodes: Vec<PullRequestNode>,
    #[serde(rename = "pageInfo")]
    pub page_info: QueryPageInfo,
}

#[derive(Debug, Deserialize)]
struct DefaultBranchRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestsRepository {
    #[serde(rename = "defaultBranchRef")]
    pub default_branch_ref: Option<DefaultBranchRef>,
    #[serde(rename = "pullRequests")]
    pub pull_requests: PullRequestsConnection,
}

#[derive(Debug, Deserialize)]
struct PullRequestsData {
    pub repository: PullRequestsRepository,
}

#[derive(Debug, Deserialize)]
struct PullRequestsResult {
    pub data: PullRequestsData,
}

#[derive(Debug, Serialize)]
struct PullRequestsVariables {
    pub owner: String,
    pub repo: String,
    pub page_limit: u64,
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TagTargetInner {
    #[serde(rename = "committedDate")]
    pub committed_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TagTarget {
    #[serde(rename = "committedDate")]
    pub committed_date: Option<String>,
    pub target: Option<TagTargetInner>,
}

#[derive(Debug, Deserialize)]
struct TagRef {
    pub target: Option<TagTarget>,
}

#[derive(Debug, Deserialize)]
struct TagRepository {
    #[serde(rename = "ref")]
    pub git_ref: Option<TagRef>,
}

#[derive(Debug, Deserialize)]
struct TagDateData {
    pub repository: TagRepository,
}

#[derive(Debug, Deserialize)]
struct TagDateResult {
    pub data: TagDateData,
}

#[derive(Debug, Serialize)]
struct TagDateVariables {
    pub owner: String,
    pub repo: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// GitHub client implementing the catalog, changelog, and publisher
/// capabilities through GraphQL queries and octocrab's release endpoint.
pub struct Github {
    config: GithubConfig,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: GithubConfig) -> Result<Self> {
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(config.api_base())?;
        let instance = builder.build()?;

        Ok(Self { config, instance })
    }

    /// Timestamp of the commit a tag points at, resolving annotated tags one
    /// level. None when the tag does not exist upstream.
    async fn tag_date(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let vars = TagDateVariables {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: format!("refs/tags/{tag}"),
        };

        let result: TagDateResult = self
            .instance
            .graphql(
                &serde_json::json!({ "query": TAG_DATE_QUERY, "variables": vars }),
            )
            .await?;

        let Some(target) =
            result.data.repository.git_ref.and_then(|r| r.target)
        else {
            return Ok(None);
        };

        let committed = target
            .committed_date
            .or_else(|| target.target.and_then(|t| t.committed_date));

        match committed {
            Some(date) => Ok(Some(
                DateTime::parse_from_rfc3339(&date)?.with_timezone(&Utc),
            )),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RepositoryCatalog for Github {
    async fn fetch_all(&self) -> Result<Vec<Repository>> {
        let vars = RepositoriesVariables {
            page_limit: DEFAULT_PAGE_SIZE.into(),
        };

        let result: RepositoriesResult = self
            .instance
            .graphql(&serde_json::json!({
                "query": REPOSITORIES_QUERY,
                "variables": vars,
            }))
            .await?;

        let mut repositories = vec![];

        for node in result.data.viewer.repositories.nodes {
            repositories.push(map_repository(node)?);
        }

        debug!("fetched {} repositories for viewer", repositories.len());

        Ok(repositories)
    }
}

#[async_trait]
impl ChangelogSource for Github {
    async fn fetch_merged_since(
        &self,
        full_name: &str,
        tag: &str,
    ) -> Result<Vec<PullRequest>> {
        if tag == NO_RELEASE_SENTINEL {
            // first release: there is no boundary to query against
            return Ok(vec![]);
        }

        let (owner, repo) = split_full_name(full_name)?;
        let since = self.tag_date(owner, repo, tag).await?;

        if since.is_none() {
            warn!(
                "tag {tag} not found for {full_name}: scanning merged pull requests without a tag boundary"
            );
        }

        let page_limit =
            cmp::min(DEFAULT_PAGE_SIZE.into(), self.config.pr_search_depth);
        let search_depth = self.config.pr_search_depth as usize;
        let mut pull_requests: Vec<PullRequest> = vec![];
        let mut scanned = 0usize;
        let mut cursor: Option<String> = None;
        let mut has_more = true;

        while has_more {
            if scanned >= search_depth {
                break;
            }

            let vars = PullRequestsVariables {
                owner: owner.to_string(),
                repo: repo.to_string(),
                page_limit,
                cursor: cursor.clone(),
            };

            let result: PullRequestsResult = self
                .instance
                .graphql(&serde_json::json!({
                    "query": MERGED_PRS_QUERY,
                    "variables": vars,
                }))
                .await?;

            let PullRequestsRepository {
                default_branch_ref,
                pull_requests: connection,
            } = result.data.repository;

            let default_branch = default_branch_ref.map(|r| r.name);

            for node in connection.nodes {
                scanned += 1;

                if let Some(default_branch) = default_branch.as_deref()
                    && node.base_ref_name != default_branch
                {
                    continue;
                }

                if let Some(pr) = map_pull_request(node)?
                    && since.is_none_or(|since| pr.merged_at > since)
                {
                    pull_requests.push(pr);
                }
            }

            cursor = connection.page_info.end_cursor;
            has_more = connection.page_info.has_next_page && cursor.is_some();
        }

        debug!(
            "found {} pull requests merged into {full_name} since {tag}",
            pull_requests.len()
        );

        Ok(pull_requests)
    }
}

#[async_trait]
impl ReleasePublisher for Github {
    async fn create(&self, req: CreateReleaseRequest) -> Result<Published> {
        let result = self
            .instance
            .repos(&req.owner, &req.repo)
            .releases()
            .create(&req.tag_name)
            .name(&req.release_name)
            .body(&req.body)
            .draft(false)
            .prerelease(false)
            .send()
            .await;

        match result {
            Ok(release) => Ok(Published::Created {
                url: release.html_url.to_string(),
            }),
            Err(octocrab::Error::GitHub { source, .. }) => {
                let tag_exists = source.status_code
                    == StatusCode::UNPROCESSABLE_ENTITY
                    && source
                        .errors
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .any(|e| e.to_string().contains("already_exists"));

                if tag_exists {
                    warn!(
                        "release tag {} already exists for {}/{}",
                        req.tag_name, req.owner, req.repo
                    );
                    let url = format!(
                        "{}/{}",
                        self.config
                            .release_link_base_url(&req.owner, &req.repo),
                        req.tag_name
                    );
                    return Ok(Published::AlreadyExists { url });
                }

                Err(HeraldError::create_release(format!(
                    "GitHub did not accept release {} for {}/{}: {}",
                    req.tag_name, req.owner, req.repo, source.message
                )))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Convert a repository node into the domain snapshot, reducing the nested
/// releases connection to at most one latest release.
fn map_repository(node: RepositoryNode) -> Result<Repository> {
    let latest_release = match node.releases.nodes.into_iter().next() {
        Some(release) => map_latest_release(release)?,
        None => None,
    };

    Ok(Repository {
        id: node.id,
        name: node.name,
        full_name: node.name_with_owner,
        latest_release,
    })
}

/// A release node missing its tag or publish timestamp (drafts) counts as
/// "no release yet".
fn map_latest_release(node: ReleaseNode) -> Result<Option<LatestRelease>> {
    let (Some(tag), Some(published_at)) = (node.tag, node.published_at)
    else {
        return Ok(None);
    };

    let published_at =
        DateTime::parse_from_rfc3339(&published_at)?.with_timezone(&Utc);

    Ok(Some(LatestRelease {
        tag: tag.name,
        published_at,
    }))
}

/// Convert a merged pull request node, defaulting a deleted author account to
/// the ghost user.
fn map_pull_request(node: PullRequestNode) -> Result<Option<PullRequest>> {
    let Some(merged_at) = node.merged_at else {
        return Ok(None);
    };

    let merged_at =
        DateTime::parse_from_rfc3339(&merged_at)?.with_timezone(&Utc);

    let (author_login, author_url) = match node.author {
        Some(author) => (author.login, author.url),
        None => ("ghost".to_string(), "https://github.com/ghost".to_string()),
    };

    Ok(Some(PullRequest {
        number: node.number,
        title: node.title,
        merged_at,
        author_login,
        author_url,
        html_url: node.url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository_node(json: serde_json::Value) -> RepositoryNode {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn maps_repository_with_release() {
        let node = repository_node(serde_json::json!({
            "id": "R_1",
            "name": "widget-api",
            "nameWithOwner": "octo/widget-api",
            "releases": {
                "nodes": [{
                    "publishedAt": "2024-03-01T12:00:00Z",
                    "tag": { "name": "v2.0.0" }
                }]
            }
        }));

        let repo = map_repository(node).unwrap();
        assert_eq!(repo.full_name, "octo/widget-api");

        let latest = repo.latest_release.unwrap();
        assert_eq!(latest.tag, "v2.0.0");
    }

    #[test]
    fn maps_repository_without_release() {
        let node = repository_node(serde_json::json!({
            "id": "R_2",
            "name": "fresh",
            "nameWithOwner": "octo/fresh",
            "releases": { "nodes": [] }
        }));

        let repo = map_repository(node).unwrap();
        assert!(repo.latest_release.is_none());
    }

    #[test]
    fn draft_release_counts_as_no_release() {
        let node = repository_node(serde_json::json!({
            "id": "R_3",
            "name": "drafty",
            "nameWithOwner": "octo/drafty",
            "releases": {
                "nodes": [{
                    "publishedAt": null,
                    "tag": { "name": "v0.1.0" }
                }]
            }
        }));

        let repo = map_repository(node).unwrap();
        assert!(repo.latest_release.is_none());
    }

    #[test]
    fn maps_pull_request_defaulting_deleted_author() {
        let node: PullRequestNode = serde_json::from_value(serde_json::json!({
            "number": 42,
            "title": "Fix the widget",
            "mergedAt": "2024-03-02T09:30:00Z",
            "url": "https://github.com/octo/widget-api/pull/42",
            "baseRefName": "main",
            "author": null
        }))
        .unwrap();

        let pr = map_pull_request(node).unwrap().unwrap();
        assert_eq!(pr.author_login, "ghost");
        assert_eq!(pr.author_url, "https://github.com/ghost");
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn skips_pull_request_without_merge_timestamp() {
        let node: PullRequestNode = serde_json::from_value(serde_json::json!({
            "number": 7,
            "title": "Never merged",
            "mergedAt": null,
            "url": "https://github.com/octo/widget-api/pull/7",
            "baseRefName": "main",
            "author": { "login": "octocat", "url": "https://github.com/octocat" }
        }))
        .unwrap();

        assert!(map_pull_request(node).unwrap().is_none());
    }
}
