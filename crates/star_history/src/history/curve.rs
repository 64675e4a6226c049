//! Building curve points from fetched data.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::types::{StarPoint, normalize};
use crate::github::{ContributorStats, PAGE_SIZE, Stargazer};
use crate::sampling::SAMPLE_BUDGET;

/// Star count a sampled page stands for: the stars on all earlier pages.
fn count_before_page(page: u32) -> u64 {
    u64::from(PAGE_SIZE) * u64::from(page.saturating_sub(1))
}

/// Reconstruct the curve from the complete stargazer list.
///
/// With `n` stargazers and `k = min(SAMPLE_BUDGET, n)`, point `j` (1-based) is
/// the stargazer of rank `ceil(j * n / k)`, so the points are evenly spaced by
/// rank and the last one carries the full count.
pub(crate) fn exact_curve(mut stargazers: Vec<Stargazer>) -> Vec<StarPoint> {
    stargazers.sort_by_key(|s| s.starred_at);

    let n = stargazers.len() as u64;
    let k = n.min(u64::from(SAMPLE_BUDGET));
    let points = (1..=k)
        .map(|j| {
            let rank = (j * n).div_ceil(k);
            let stargazer = &stargazers[(rank - 1) as usize];
            StarPoint::new(stargazer.starred_at.date_naive(), rank)
        })
        .collect();

    normalize(points)
}

/// One point per sampled page, dated by the page's first stargazer.
///
/// Empty pages contribute nothing.
pub(crate) fn sampled_points(pages: &BTreeMap<u32, Vec<Stargazer>>) -> Vec<StarPoint> {
    pages
        .iter()
        .filter_map(|(page, stargazers)| {
            stargazers
                .first()
                .map(|s| StarPoint::new(s.starred_at.date_naive(), count_before_page(*page)))
        })
        .collect()
}

/// One point per planned page, dated from contributor activity.
///
/// Weekly activity of all contributors is merged; the date for page `p` is the
/// first active week by which cumulative activity reaches `(p - 1) /
/// total_pages` of the total. Page 1 therefore sits on the first active week
/// with count 0. Pages that land on a date already taken move to the next
/// free day, so every page keeps its own point. Returns `None` when there is
/// no activity at all.
pub(crate) fn activity_points(
    stats: &[ContributorStats],
    pages: &BTreeSet<u32>,
    total_pages: u32,
) -> Option<Vec<StarPoint>> {
    let mut weekly: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for contributor in stats {
        for week in &contributor.weeks {
            if let Some(start) = week.week_start() {
                *weekly.entry(start.date_naive()).or_default() += week.total();
            }
        }
    }

    let active: Vec<(NaiveDate, u64)> = weekly.into_iter().filter(|(_, t)| *t > 0).collect();
    let grand_total: u128 = active.iter().map(|(_, t)| u128::from(*t)).sum();
    if grand_total == 0 {
        return None;
    }

    let total_pages = u128::from(total_pages.max(1));
    let mut points: Vec<StarPoint> = Vec::with_capacity(pages.len());
    for &page in pages {
        let target = grand_total * u128::from(page.saturating_sub(1));
        let mut cumulative: u128 = 0;
        // cumulative / grand_total >= (page - 1) / total_pages
        let week = active.iter().find(|(_, total)| {
            cumulative += u128::from(*total);
            cumulative * total_pages >= target
        });
        let Some((week_date, _)) = week else {
            continue;
        };
        let mut date = *week_date;
        if let Some(previous) = points.last()
            && date <= previous.date
        {
            date = previous.date.succ_opt().unwrap_or(previous.date);
        }
        points.push(StarPoint::new(date, count_before_page(page)));
    }

    Some(points)
}
