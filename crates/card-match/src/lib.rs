//! Credit card matching for large one-time tuition payments.
//!
//! The [`matching`] module holds the engine: eligibility gates, savings math, preference
//! scoring, ranking with category diversity and the two-card split optimizer. The remaining
//! modules carry the service plumbing shared with the `card-match-api` binary.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
