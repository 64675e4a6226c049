//! Star history sampling.
//!
//! A run goes `discover -> plan -> exact | sampled`:
//!
//! - fewer stargazer pages than [`SAMPLE_BUDGET`]: every page is fetched and
//!   the curve is rebuilt exactly from the sorted stargazer list;
//! - otherwise only the planned pages are fetched, each contributing one
//!   point, and the curve is anchored at today with the live star count.
//!   Unauthenticated callers try the contributor-activity strategy first,
//!   which costs two requests rather than fifteen, and fall back to stargazer
//!   pages while GitHub is still computing the statistics or has none.
//!
//! Any failed request aborts the run. Nothing is retried or cached.

mod curve;
mod fetch;
mod types;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

pub use types::{StarHistory, StarPoint, Strategy};

use crate::error::{HistoryError, Result};
use crate::github::{GITHUB_API_URL, GitHubClient, RepoName};
use crate::http::HttpTransport;
use crate::sampling::{PaginationInfo, SAMPLE_BUDGET, discover, plan};
use fetch::fetch_stargazer_pages;
use types::normalize;

/// Input to one sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    /// `owner/name`.
    pub repo: String,
    /// Optional GitHub token; raises the upstream rate limit.
    pub access_token: Option<String>,
}

impl SampleRequest {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Computes star histories over a shared transport.
///
/// Runs are independent: no state is kept between calls.
#[derive(Clone)]
pub struct HistorySampler {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl HistorySampler {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: GITHUB_API_URL.to_string(),
        }
    }

    /// Use another API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sample the star history of `request.repo` as of now.
    pub async fn sample(&self, request: &SampleRequest) -> Result<StarHistory> {
        self.sample_at(request, Utc::now()).await
    }

    /// Sample with an explicit "now", which dates the live-count anchor.
    pub async fn sample_at(
        &self,
        request: &SampleRequest,
        now: DateTime<Utc>,
    ) -> Result<StarHistory> {
        let repo = RepoName::parse(&request.repo)?;
        let client = GitHubClient::new(Arc::clone(&self.transport), request.access_token.clone())
            .with_base_url(&self.base_url);

        let info = discover(&client, &repo).await?;
        let pages = plan(info.total_pages);
        let today = now.date_naive();

        let (strategy, points) = if info.total_pages < SAMPLE_BUDGET {
            (Strategy::Exact, exact_path(&client, &repo, info, &pages).await?)
        } else if client.is_authenticated() {
            (
                Strategy::SampledStargazers,
                stargazer_path(&client, &repo, info, &pages, today).await?,
            )
        } else {
            let samples = activity_samples(&client, &repo, &info, &pages).await?;
            match samples {
                Some(points) => (
                    Strategy::SampledActivity,
                    anchor(&client, &repo, points, today).await?,
                ),
                None => (
                    Strategy::SampledStargazers,
                    stargazer_path(&client, &repo, info, &pages, today).await?,
                ),
            }
        };

        tracing::info!(
            repo = %repo,
            strategy = %strategy,
            points = points.len(),
            "star history sampled"
        );

        Ok(StarHistory {
            repo: repo.full_name(),
            strategy,
            points,
        })
    }
}

/// Page 1 is already known from discovery.
fn remaining_pages(pages: &BTreeSet<u32>) -> impl Iterator<Item = u32> + '_ {
    pages.iter().copied().filter(|page| *page != 1)
}

async fn exact_path(
    client: &GitHubClient,
    repo: &RepoName,
    info: PaginationInfo,
    pages: &BTreeSet<u32>,
) -> Result<Vec<StarPoint>> {
    tracing::debug!(repo = %repo, pages = pages.len(), "fetching every stargazer page");
    let fetched = fetch_stargazer_pages(client, repo, remaining_pages(pages)).await?;

    let mut stargazers = info.first_page;
    for items in fetched.into_values() {
        stargazers.extend(items);
    }
    Ok(curve::exact_curve(stargazers))
}

async fn stargazer_path(
    client: &GitHubClient,
    repo: &RepoName,
    info: PaginationInfo,
    pages: &BTreeSet<u32>,
    today: NaiveDate,
) -> Result<Vec<StarPoint>> {
    tracing::debug!(repo = %repo, total_pages = info.total_pages, "sampling stargazer pages");
    let mut fetched = fetch_stargazer_pages(client, repo, remaining_pages(pages)).await?;
    fetched.insert(1, info.first_page);

    let points = curve::sampled_points(&fetched);
    anchor(client, repo, points, today).await
}

/// Activity-dated samples, or `None` when the statistics are not usable yet.
async fn activity_samples(
    client: &GitHubClient,
    repo: &RepoName,
    info: &PaginationInfo,
    pages: &BTreeSet<u32>,
) -> Result<Option<Vec<StarPoint>>> {
    tracing::debug!(repo = %repo, "unauthenticated, sampling contributor activity");
    let stats = match client.contributor_stats(repo).await {
        Ok(stats) => stats,
        Err(HistoryError::StatisticsPending { .. }) => {
            tracing::info!(repo = %repo, "contributor statistics pending, sampling stargazer pages");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let points = curve::activity_points(&stats, pages, info.total_pages);
    if points.is_none() {
        tracing::info!(repo = %repo, "no contributor activity, sampling stargazer pages");
    }
    Ok(points)
}

/// Append today's live star count and normalize.
///
/// Samples dated after today are pulled back to today, where the anchor
/// replaces them.
async fn anchor(
    client: &GitHubClient,
    repo: &RepoName,
    mut points: Vec<StarPoint>,
    today: NaiveDate,
) -> Result<Vec<StarPoint>> {
    let summary = client.repo_summary(repo).await?;
    for point in &mut points {
        point.date = point.date.min(today);
    }
    points.push(StarPoint::new(today, summary.stargazers_count));
    Ok(normalize(points))
}

/// Sample a repository over the default reqwest transport.
///
/// Convenience entry point for callers that do not manage a transport.
#[cfg(feature = "reqwest")]
pub async fn fetch_star_history(repo: &str, access_token: Option<&str>) -> Result<StarHistory> {
    use crate::http::reqwest_transport::ReqwestTransport;

    let sampler = HistorySampler::new(Arc::new(ReqwestTransport::default()));
    let mut request = SampleRequest::new(repo);
    if let Some(token) = access_token {
        request = request.with_token(token);
    }
    sampler.sample(&request).await
}
