//! GitHub API data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::HistoryError;

/// Default REST API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Page size requested from the stargazers endpoint (GitHub's maximum).
pub const PAGE_SIZE: u32 = 100;

/// Media type that makes the stargazers endpoint include `starred_at`.
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.v3.star+json";

/// Default media type for all other endpoints.
pub const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub rejects requests without a User-Agent.
pub const USER_AGENT: &str = "star-history";

/// A validated `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoName {
    owner: String,
    name: String,
}

impl RepoName {
    /// Parse an `owner/name` identifier.
    ///
    /// Surrounding whitespace is ignored. Anything other than exactly two
    /// non-empty segments is rejected.
    pub fn parse(identifier: &str) -> Result<Self, HistoryError> {
        let trimmed = identifier.trim();
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None)
                if is_valid_segment(owner) && is_valid_segment(name) =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(HistoryError::InvalidRepository(identifier.to_string())),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the full name (owner/name).
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().any(|c| c.is_whitespace() || c == '?' || c == '#')
}

impl FromStr for RepoName {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One entry of the stargazers listing (star media type).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stargazer {
    /// When the star was given.
    pub starred_at: DateTime<Utc>,
}

/// The subset of `GET /repos/{repo}` the sampler needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    /// Live star count.
    pub stargazers_count: u64,
}

/// One contributor entry of `GET /repos/{repo}/stats/contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContributorStats {
    /// Weekly activity buckets, oldest first.
    #[serde(default)]
    pub weeks: Vec<WeeklyActivity>,
}

/// A weekly activity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WeeklyActivity {
    /// Start of the week, unix seconds.
    pub w: i64,
    /// Lines added.
    #[serde(default)]
    pub a: u64,
    /// Lines deleted.
    #[serde(default)]
    pub d: u64,
    /// Commits.
    #[serde(default)]
    pub c: u64,
}

impl WeeklyActivity {
    /// Total activity in the bucket.
    pub fn total(&self) -> u64 {
        self.a.saturating_add(self.d).saturating_add(self.c)
    }

    /// Start of the week as a timestamp.
    pub fn week_start(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.w, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name_parse() {
        let repo = RepoName::parse("rust-lang/rust").unwrap();
        assert_eq!(repo.owner(), "rust-lang");
        assert_eq!(repo.name(), "rust");
        assert_eq!(repo.full_name(), "rust-lang/rust");
        assert_eq!(repo.to_string(), "rust-lang/rust");

        let trimmed: RepoName = "  tokio-rs/tokio \n".parse().unwrap();
        assert_eq!(trimmed.full_name(), "tokio-rs/tokio");
    }

    #[test]
    fn test_repo_name_rejects_malformed_identifiers() {
        for bad in [
            "",
            "rust",
            "/rust",
            "rust-lang/",
            "a/b/c",
            "rust lang/rust",
            "o/r?page=2",
        ] {
            let err = RepoName::parse(bad).expect_err(bad);
            assert!(matches!(err, HistoryError::InvalidRepository(ref s) if s == bad));
        }
    }

    #[test]
    fn test_stargazer_deserializes_star_media_type() {
        let json = r#"[{"starred_at":"2021-03-04T05:06:07Z","user":{"login":"octocat"}}]"#;
        let stargazers: Vec<Stargazer> = serde_json::from_str(json).unwrap();
        assert_eq!(stargazers.len(), 1);
        assert_eq!(
            stargazers[0].starred_at.date_naive().to_string(),
            "2021-03-04"
        );
    }

    #[test]
    fn test_contributor_stats_totals() {
        let json = r#"[{"total":3,"weeks":[{"w":1609632000,"a":10,"d":2,"c":1},{"w":1610236800}]}]"#;
        let stats: Vec<ContributorStats> = serde_json::from_str(json).unwrap();
        assert_eq!(stats[0].weeks.len(), 2);
        assert_eq!(stats[0].weeks[0].total(), 13);
        assert_eq!(stats[0].weeks[1].total(), 0);
        assert_eq!(
            stats[0].weeks[0].week_start().unwrap().date_naive().to_string(),
            "2021-01-03"
        );
    }
}
