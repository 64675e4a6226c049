//! GitHub API client and pagination header parsing.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::types::{
    ContributorStats, GITHUB_API_URL, JSON_MEDIA_TYPE, PAGE_SIZE, RepoName, RepoSummary,
    STAR_MEDIA_TYPE, Stargazer, USER_AGENT,
};
use crate::error::{HistoryError, Result};
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/repositories/123/stargazers?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            if rel_type == "last" {
                info.last_page = Some(page_num);
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    for param in query.split('&') {
        if let Some(value) = param.strip_prefix("page=") {
            return value.parse().ok();
        }
    }

    None
}

/// Page count as announced by a response's `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPageCount {
    /// No `Link` header: the collection fits on one page.
    Absent,
    /// A `rel="last"` relation announced this many pages.
    Pages(u32),
    /// A `Link` header was present but carried no usable `rel="last"` page.
    Malformed,
}

impl LinkPageCount {
    /// Classify an optional `Link` header value.
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::Absent;
        };
        match parse_link_header(header).total_pages() {
            Some(pages) if pages > 0 => Self::Pages(pages),
            _ => Self::Malformed,
        }
    }

    /// Resolve to a page count.
    ///
    /// A malformed header counts as a single page rather than an error.
    pub fn total_pages(self) -> u32 {
        match self {
            Self::Absent | Self::Malformed => 1,
            Self::Pages(pages) => pages,
        }
    }
}

impl LinkPagination {
    /// Returns the total number of pages if known.
    pub fn total_pages(&self) -> Option<u32> {
        self.last_page
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_count: LinkPageCount,
}

/// GitHub REST client over an [`HttpTransport`].
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl GitHubClient {
    /// Create a client, authenticated when `token` is provided.
    pub fn new(transport: Arc<dyn HttpTransport>, token: Option<String>) -> Self {
        Self {
            transport,
            base_url: Arc::from(GITHUB_API_URL),
            token: token
                .filter(|t| !t.trim().is_empty())
                .map(|t| Arc::from(t.trim())),
        }
    }

    /// Point the client at another API root (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Arc::from(base_url.trim_end_matches('/'));
        self
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, route: &str, accept: &str) -> HttpRequest {
        let mut request = HttpRequest::get(format!("{}{}", self.base_url, route))
            .with_header("Accept", accept)
            .with_header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.with_header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    /// Issue a GET and turn non-2xx responses into [`HistoryError::Upstream`].
    async fn get(&self, route: &str, accept: &str) -> Result<HttpResponse> {
        let request = self.request(route, accept);
        tracing::debug!(url = %request.url, "GET");

        let response = self.transport.get(request).await?;
        if !response.is_success() {
            tracing::debug!(status = response.status, route, "upstream request failed");
            return Err(HistoryError::upstream(response.status, response.body_text()));
        }
        Ok(response)
    }

    /// Fetch one page of stargazers, with `starred_at` timestamps.
    pub async fn stargazers_page(&self, repo: &RepoName, page: u32) -> Result<Page<Stargazer>> {
        let route = format!(
            "/repos/{}/{}/stargazers?per_page={}&page={}",
            repo.owner(),
            repo.name(),
            PAGE_SIZE,
            page
        );
        let response = self.get(&route, STAR_MEDIA_TYPE).await?;
        let page_count = LinkPageCount::from_header(response.header("link"));
        let items = decode(&response, "stargazers page")?;
        Ok(Page { items, page_count })
    }

    /// Fetch the repository summary carrying the live star count.
    pub async fn repo_summary(&self, repo: &RepoName) -> Result<RepoSummary> {
        let route = format!("/repos/{}/{}", repo.owner(), repo.name());
        let response = self.get(&route, JSON_MEDIA_TYPE).await?;
        decode(&response, "repository summary")
    }

    /// Fetch weekly contributor activity.
    ///
    /// GitHub answers 202 with an empty body while it computes the statistics.
    pub async fn contributor_stats(&self, repo: &RepoName) -> Result<Vec<ContributorStats>> {
        let route = format!("/repos/{}/{}/stats/contributors", repo.owner(), repo.name());
        let response = self.get(&route, JSON_MEDIA_TYPE).await?;
        if response.status == 202 {
            return Err(HistoryError::StatisticsPending {
                repo: repo.full_name(),
            });
        }
        // 204 No Content: no statistics for an empty repository.
        if response.body.is_empty() {
            return Ok(Vec::new());
        }
        decode(&response, "contributor statistics")
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse, context: &str) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| HistoryError::decode(context, e))
}
