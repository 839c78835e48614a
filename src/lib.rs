//! Pull request review and merge timing metrics for a GitHub repository.
//!
//! Merged pull requests are fetched page by page from the GraphQL search
//! API, each one is reduced to a row of counts and business-hours
//! durations, and the rows are rendered as a table or as CSV.

pub mod cache;
pub mod error;
pub mod github;
pub mod metrics;
pub mod ui;
pub mod util;
