//! Changelog rendering from merged pull requests.
use crate::forge::types::PullRequest;

/// Render the release body: one line per pull request, in the order given.
/// Callers pass the list sorted oldest-merged-first so the changelog reads
/// chronologically. An empty list yields an empty body.
pub fn render(pull_requests: &[PullRequest]) -> String {
    pull_requests
        .iter()
        .map(|pr| {
            format!(
                "- {} ([#{}]({}) by [@{}]({}))",
                pr.title, pr.number, pr.html_url, pr.author_login, pr.author_url
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn pull_request(number: u64, title: &str) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            merged_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            author_login: "octocat".to_string(),
            author_url: "https://github.com/octocat".to_string(),
            html_url: format!(
                "https://github.com/octo/widget-api/pull/{number}"
            ),
        }
    }

    #[test]
    fn renders_one_linked_line_per_pull_request() {
        let prs = vec![pull_request(12, "Fix the widget")];

        assert_eq!(
            render(&prs),
            "- Fix the widget ([#12](https://github.com/octo/widget-api/pull/12) by [@octocat](https://github.com/octocat))"
        );
    }

    #[test]
    fn preserves_input_order() {
        let prs = vec![
            pull_request(1, "First"),
            pull_request(2, "Second"),
            pull_request(3, "Third"),
        ];

        let body = render(&prs);
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("First"));
        assert!(lines[1].contains("Second"));
        assert!(lines[2].contains("Third"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let prs = vec![pull_request(1, "First"), pull_request(2, "Second")];

        assert_eq!(render(&prs), render(&prs));
    }

    #[test]
    fn empty_list_yields_empty_body() {
        assert_eq!(render(&[]), "");
    }
}
