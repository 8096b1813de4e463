//! CLI argument parsing and GitHub connection configuration.
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::env;

use crate::{
    error::{HeraldError, Result},
    forge::config::{DEFAULT_PR_SEARCH_DEPTH, GithubConfig},
    orchestrator::VersionBump,
};

/// Global CLI arguments for GitHub configuration and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value = "github.com", global = true)]
    /// GitHub host. Override for Enterprise instances.
    pub github_host: String,

    #[arg(long, default_value = "", global = true)]
    /// Voice-assistant user id allowed to trigger releases. Falls back to
    /// APPROVED_USER_ID env var.
    pub approved_user: String,

    #[arg(long, default_value_t = DEFAULT_PR_SEARCH_DEPTH, global = true)]
    /// Maximum merged pull requests to scan per release. Use 0 for no limit.
    pub pr_search_depth: u64,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a repository by name and publish its next release.
    Release {
        /// Repository name as spoken or typed. Fuzzy-matched against your
        /// repositories.
        #[arg(long)]
        repo: String,

        /// Which semantic version component to increment.
        #[arg(long, value_enum)]
        bump: VersionBump,
    },

    /// Read one fulfillment request from stdin and print the response.
    Handle,
}

impl Args {
    /// Configure the GitHub connection from CLI arguments.
    pub fn github_config(&self) -> Result<GithubConfig> {
        let mut token = self.github_token.clone();

        if token.is_empty()
            && let Ok(env_var_token) = env::var("GITHUB_TOKEN")
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(HeraldError::invalid_config("must set github token"));
        }

        let mut search_depth = self.pr_search_depth;

        if search_depth == 0 {
            search_depth = u64::MAX;
        }

        Ok(GithubConfig {
            host: self.github_host.clone(),
            scheme: "https".to_string(),
            token: SecretString::from(token),
            pr_search_depth: search_depth,
        })
    }

    /// Resolve the approved voice-assistant caller identity.
    pub fn approved_user(&self) -> Result<String> {
        let mut user = self.approved_user.clone();

        if user.is_empty()
            && let Ok(env_var_user) = env::var("APPROVED_USER_ID")
        {
            user = env_var_user;
        }

        if user.is_empty() {
            return Err(HeraldError::invalid_config(
                "must set approved user id",
            ));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing and connection configuration.
    use super::*;

    fn args(token: &str, depth: u64) -> Args {
        Args {
            github_token: token.into(),
            github_host: "github.com".into(),
            approved_user: "user-1".into(),
            pr_search_depth: depth,
            debug: false,
            command: Command::Handle,
        }
    }

    /// Test GitHub configuration from CLI arguments.
    #[test]
    fn gets_github_config() {
        let cli_args = args("github_token", DEFAULT_PR_SEARCH_DEPTH);

        let result = cli_args.github_config();
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.host, "github.com");
        assert_eq!(config.pr_search_depth, DEFAULT_PR_SEARCH_DEPTH);
    }

    /// Test that a zero search depth means unlimited.
    #[test]
    fn zero_search_depth_means_unlimited() {
        let cli_args = args("github_token", 0);

        let config = cli_args.github_config().unwrap();
        assert_eq!(config.pr_search_depth, u64::MAX);
    }

    #[test]
    fn gets_approved_user_from_args() {
        let cli_args = args("github_token", DEFAULT_PR_SEARCH_DEPTH);

        assert_eq!(cli_args.approved_user().unwrap(), "user-1");
    }
}
