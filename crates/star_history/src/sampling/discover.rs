use crate::error::{HistoryError, Result};
use crate::github::{GitHubClient, LinkPageCount, RepoName, Stargazer};

/// What the first stargazers request tells us about the collection.
#[derive(Debug, Clone)]
pub struct PaginationInfo {
    /// Total number of stargazer pages, at least 1.
    pub total_pages: u32,
    /// Contents of page 1, reused by the sampler.
    pub first_page: Vec<Stargazer>,
}

/// Fetch stargazer page 1 and derive the page count from its `Link` header.
///
/// Fails with [`HistoryError::EmptyRepository`] when the only page is empty.
pub async fn discover(client: &GitHubClient, repo: &RepoName) -> Result<PaginationInfo> {
    let page = client.stargazers_page(repo, 1).await?;
    if page.page_count == LinkPageCount::Malformed {
        tracing::warn!(repo = %repo, "Unrecognized Link header, assuming a single page");
    }
    let total_pages = page.page_count.total_pages();

    if total_pages == 1 && page.items.is_empty() {
        return Err(HistoryError::EmptyRepository {
            repo: repo.full_name(),
        });
    }

    tracing::debug!(repo = %repo, total_pages, "discovered stargazer pagination");
    Ok(PaginationInfo {
        total_pages,
        first_page: page.items,
    })
}
