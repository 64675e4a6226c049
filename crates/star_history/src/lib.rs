//! star_history - approximate a GitHub repository's star growth curve.
//!
//! GitHub has no "stars over time" endpoint, and listing every stargazer of a
//! popular repository takes thousands of requests. This crate reconstructs the
//! curve within a fixed budget of [`SAMPLE_BUDGET`] page requests: small
//! repositories are rebuilt exactly, large ones are sampled and anchored at
//! the live star count.
//!
//! # Features
//!
//! - `reqwest` (default) - Enables [`http::reqwest_transport::ReqwestTransport`]
//!   and the [`fetch_star_history`] convenience function.
//!
//! # Example
//!
//! ```ignore
//! use star_history::{HistorySampler, SampleRequest};
//!
//! let sampler = HistorySampler::new(transport);
//! let history = sampler
//!     .sample(&SampleRequest::new("rust-lang/rust").with_token(token))
//!     .await?;
//!
//! for point in &history.points {
//!     println!("{} {}", point.date, point.count);
//! }
//! ```

pub mod error;
pub mod github;
pub mod history;
pub mod http;
pub mod sampling;

pub use error::{HistoryError, Result};
#[cfg(feature = "reqwest")]
pub use history::fetch_star_history;
pub use history::{HistorySampler, SampleRequest, StarHistory, StarPoint, Strategy};
pub use sampling::{PaginationInfo, SAMPLE_BUDGET, discover, plan};
