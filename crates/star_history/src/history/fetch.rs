//! Concurrent page fetching.

use std::collections::BTreeMap;

use tokio::task::JoinSet;

use crate::error::{HistoryError, Result};
use crate::github::{GitHubClient, RepoName, Stargazer};

/// Fetch a batch of stargazer pages concurrently.
///
/// Every request runs to completion. The batch succeeds only if all of them
/// did; otherwise the error of the lowest failing page is returned and the
/// fetched pages are discarded.
pub(crate) async fn fetch_stargazer_pages(
    client: &GitHubClient,
    repo: &RepoName,
    pages: impl IntoIterator<Item = u32>,
) -> Result<BTreeMap<u32, Vec<Stargazer>>> {
    let mut join_set: JoinSet<(u32, Result<Vec<Stargazer>>)> = JoinSet::new();
    for page in pages {
        let client = client.clone();
        let repo = repo.clone();
        join_set.spawn(async move {
            let result = client.stargazers_page(&repo, page).await;
            (page, result.map(|p| p.items))
        });
    }

    let mut fetched = BTreeMap::new();
    let mut failures: BTreeMap<u32, HistoryError> = BTreeMap::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((page, Ok(items))) => {
                fetched.insert(page, items);
            }
            Ok((page, Err(e))) => {
                tracing::debug!(page, error = %e, "stargazer page fetch failed");
                failures.insert(page, e);
            }
            Err(e) => return Err(HistoryError::Internal(format!("page fetch task: {e}"))),
        }
    }

    match failures.into_iter().next() {
        Some((_, e)) => Err(e),
        None => Ok(fetched),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http::MockTransport;

    fn page_url(page: u32) -> String {
        format!("https://api.github.com/repos/o/r/stargazers?per_page=100&page={page}")
    }

    fn setup() -> (MockTransport, GitHubClient, RepoName) {
        let transport = MockTransport::new();
        let client = GitHubClient::new(Arc::new(transport.clone()), Some("t".into()));
        (transport, client, RepoName::parse("o/r").unwrap())
    }

    #[tokio::test]
    async fn test_fetch_collects_every_page() {
        let (transport, client, repo) = setup();
        for page in [2, 5, 9] {
            transport.push_json(
                page_url(page),
                200,
                serde_json::json!([{"starred_at": format!("2020-01-{:02}T00:00:00Z", page)}]),
                &[],
            );
        }

        let pages = fetch_stargazer_pages(&client, &repo, [2, 5, 9]).await.unwrap();
        assert_eq!(pages.keys().copied().collect::<Vec<_>>(), vec![2, 5, 9]);
        assert_eq!(
            pages[&9][0].starred_at.date_naive().to_string(),
            "2020-01-09"
        );
    }

    #[tokio::test]
    async fn test_fetch_fails_whole_batch_and_runs_every_request() {
        let (transport, client, repo) = setup();
        transport.push_json(page_url(2), 200, serde_json::json!([]), &[]);
        transport.push_json(page_url(3), 502, serde_json::json!({}), &[]);
        transport.push_json(page_url(4), 500, serde_json::json!({}), &[]);

        let err = fetch_stargazer_pages(&client, &repo, [2, 3, 4])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_empty_batch() {
        let (transport, client, repo) = setup();
        let pages = fetch_stargazer_pages(&client, &repo, Vec::new()).await.unwrap();
        assert!(pages.is_empty());
        assert!(transport.requests().is_empty());
    }
}
