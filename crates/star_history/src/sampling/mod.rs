//! Pagination discovery and sample planning.
//!
//! These are the two steps that run before any curve is built: learn how many
//! stargazer pages exist, then pick which of them to fetch.

mod discover;
mod plan;

pub use discover::{PaginationInfo, discover};
pub use plan::{SAMPLE_BUDGET, plan};
