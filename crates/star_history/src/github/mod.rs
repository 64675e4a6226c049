//! GitHub REST API access for star history sampling.
//!
//! # Module Structure
//!
//! - [`types`] - Repository identifiers, upstream payloads and API constants
//! - [`client`] - The REST client and `Link` header parsing
//!
//! ```ignore
//! use star_history::github::{GitHubClient, RepoName};
//!
//! let client = GitHubClient::new(transport, Some(token));
//! let page = client.stargazers_page(&RepoName::parse("rust-lang/rust")?, 1).await?;
//! ```

mod client;
mod types;

pub use client::{GitHubClient, LinkPageCount, LinkPagination, Page, parse_link_header};

pub use types::{
    ContributorStats, GITHUB_API_URL, JSON_MEDIA_TYPE, PAGE_SIZE, RepoName, RepoSummary,
    STAR_MEDIA_TYPE, Stargazer, USER_AGENT, WeeklyActivity,
};
