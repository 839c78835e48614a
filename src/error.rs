use thiserror::Error;

/// Fatal errors. Configuration variants are raised before any query is
/// issued; the rest come from the GraphQL collaborator and abort the run.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid repository name: {0:?} (expected OWNER/REPO or HOST/OWNER/REPO)")]
    InvalidRepository(String),

    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("invalid workday hours: {0}")]
    InvalidWorkday(String),

    #[error("GitHub API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("search page reported more results but no end cursor")]
    MissingCursor,
}
