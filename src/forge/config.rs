//! Configuration for the GitHub connection.
use secrecy::SecretString;

/// Default page size for paginated GraphQL queries.
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// Default number of merged pull requests to scan when building a changelog.
pub const DEFAULT_PR_SEARCH_DEPTH: u64 = 200;

/// GitHub connection configuration for authenticating and interacting with
/// the API on behalf of the caller.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// GitHub host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Maximum merged pull requests to scan per release.
    pub pr_search_depth: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            scheme: "https".to_string(),
            token: SecretString::from("".to_string()),
            pr_search_depth: DEFAULT_PR_SEARCH_DEPTH,
        }
    }
}

impl GithubConfig {
    /// API base URL derived from host and scheme.
    pub fn api_base(&self) -> String {
        format!("{}://api.{}", self.scheme, self.host)
    }

    /// Base URL for release links on the web UI.
    pub fn release_link_base_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}://{}/{}/{}/releases/tag",
            self.scheme, self.host, owner, repo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_github_dot_com() {
        let config = GithubConfig::default();
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.pr_search_depth, DEFAULT_PR_SEARCH_DEPTH);
    }

    #[test]
    fn test_release_link_base_url() {
        let config = GithubConfig::default();
        assert_eq!(
            config.release_link_base_url("octo", "widget-api"),
            "https://github.com/octo/widget-api/releases/tag"
        );
    }
}
