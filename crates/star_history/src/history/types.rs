use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cumulative star count as of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarPoint {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub count: u64,
}

impl StarPoint {
    pub fn new(date: NaiveDate, count: u64) -> Self {
        Self { date, count }
    }
}

/// How a curve was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Every stargazer was fetched.
    Exact,
    /// A planned subset of stargazer pages was fetched.
    SampledStargazers,
    /// Contributor activity stood in for stargazer timestamps.
    SampledActivity,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::SampledStargazers => "sampled_stargazers",
            Strategy::SampledActivity => "sampled_activity",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository's growth curve, ascending by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarHistory {
    /// `owner/name`.
    pub repo: String,
    pub strategy: Strategy,
    pub points: Vec<StarPoint>,
}

impl StarHistory {
    /// The most recent count on the curve.
    pub fn latest_count(&self) -> Option<u64> {
        self.points.last().map(|p| p.count)
    }
}

/// Turn raw observations into a well-formed curve.
///
/// Points are ordered by date (stable, so callers control tie order). Of
/// several observations on one day the last one wins. Counts are then clamped
/// from the right so the curve never decreases towards its final point.
pub(crate) fn normalize(mut points: Vec<StarPoint>) -> Vec<StarPoint> {
    points.sort_by_key(|p| p.date);

    let mut curve: Vec<StarPoint> = Vec::with_capacity(points.len());
    for point in points {
        match curve.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => curve.push(point),
        }
    }

    let mut ceiling = u64::MAX;
    for point in curve.iter_mut().rev() {
        point.count = point.count.min(ceiling);
        ceiling = point.count;
    }

    curve
}
