use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp exactly as it arrived on the wire.
///
/// Parsing is deferred to the metric that needs it, so a single malformed
/// value only blanks the cells that depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// RFC 3339, normalised to UTC. `None` for empty or malformed input.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Unknown,
}

impl ReviewState {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            "COMMENTED" => Self::Commented,
            "DISMISSED" => Self::Dismissed,
            "PENDING" => Self::Pending,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub author_login: String,
    pub created_at: Timestamp,
    pub state: ReviewState,
}

impl ReviewEvent {
    pub fn is_approval(&self) -> bool {
        self.state == ReviewState::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub committed_at: Timestamp,
}

/// One merged pull request, translated from the search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub author_login: String,
    pub number: u64,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub created_at: Timestamp,
    pub merged_at: Timestamp,
    pub is_draft: bool,
    pub participants_count: u64,
    pub comments_count: u64,
    /// Total commits on the PR; `commits` only holds the first page of them.
    pub commit_count: u64,
    /// Reviews in the order the platform returned them, earliest first.
    pub reviews: Vec<ReviewEvent>,
    pub commits: Vec<CommitEvent>,
    /// Set only when the PR left draft state at some point.
    pub ready_for_review_at: Option<Timestamp>,
}

impl PullRequestRecord {
    /// Reviews written by anyone other than the PR author, order preserved.
    pub fn reviewer_reviews(&self) -> impl DoubleEndedIterator<Item = &ReviewEvent> {
        self.reviews
            .iter()
            .filter(move |r| r.author_login != self.author_login)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResultPage {
    pub records: Vec<PullRequestRecord>,
    pub has_next_page: bool,
    /// Only meaningful while `has_next_page` is true.
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: Option<DateTime<Utc>>,
}
