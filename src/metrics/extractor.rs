use chrono::Duration;

use super::calendar::BusinessCalendar;
use super::duration::DurationFormatter;
use crate::github::models::PullRequestRecord;

pub const COLUMN_HEADERS: [&str; 11] = [
    "PR",
    "Commits",
    "Additions",
    "Deletions",
    "Changed Files",
    "Time to First Review",
    "Comments",
    "Participants",
    "Feature Lead Time",
    "First to Last Review",
    "First Approval to Merge",
];

/// One formatted report row, always `COLUMN_HEADERS.len()` cells wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow(Vec<String>);

impl MetricRow {
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0
    }
}

/// Derives the per-PR metrics. Holds only read-only configuration, so one
/// value is shared by every record of a run.
#[derive(Debug, Clone)]
pub struct MetricsExtractor<'a> {
    calendar: &'a BusinessCalendar,
    formatter: DurationFormatter,
}

impl<'a> MetricsExtractor<'a> {
    pub fn new(calendar: &'a BusinessCalendar, formatter: DurationFormatter) -> Self {
        Self {
            calendar,
            formatter,
        }
    }

    pub fn row(&self, pr: &PullRequestRecord) -> MetricRow {
        MetricRow(vec![
            pr.number.to_string(),
            pr.commit_count.to_string(),
            pr.additions.to_string(),
            pr.deletions.to_string(),
            pr.changed_files.to_string(),
            self.time_to_first_review(pr),
            pr.comments_count.to_string(),
            pr.participants_count.to_string(),
            self.feature_lead_time(pr),
            self.first_review_to_last_review(pr),
            self.first_approval_to_merge(pr),
        ])
    }

    pub fn time_to_first_review(&self, pr: &PullRequestRecord) -> String {
        self.formatter.format_opt(self.time_to_first_review_duration(pr))
    }

    pub fn feature_lead_time(&self, pr: &PullRequestRecord) -> String {
        self.formatter.format_opt(self.feature_lead_time_duration(pr))
    }

    pub fn first_review_to_last_review(&self, pr: &PullRequestRecord) -> String {
        self.formatter
            .format_opt(self.first_review_to_last_review_duration(pr))
    }

    pub fn first_approval_to_merge(&self, pr: &PullRequestRecord) -> String {
        self.formatter
            .format_opt(self.first_approval_to_merge_duration(pr))
    }

    /// From the PR becoming reviewable to the first review by someone else.
    /// A PR still in draft with no ready-for-review event has no value.
    pub fn time_to_first_review_duration(&self, pr: &PullRequestRecord) -> Option<Duration> {
        let ready_at = match (&pr.ready_for_review_at, pr.is_draft) {
            (Some(ready), _) => ready.parse()?,
            (None, true) => return None,
            (None, false) => pr.created_at.parse()?,
        };
        let first_review = pr.reviewer_reviews().next()?;

        Some(
            self.calendar
                .working_duration(first_review.created_at.parse()?, ready_at),
        )
    }

    /// From the first commit to the merge.
    pub fn feature_lead_time_duration(&self, pr: &PullRequestRecord) -> Option<Duration> {
        let first_commit = pr.commits.first()?;

        Some(
            self.calendar
                .working_duration(pr.merged_at.parse()?, first_commit.committed_at.parse()?),
        )
    }

    /// From the first review by someone else to the last approval by
    /// someone else.
    pub fn first_review_to_last_review_duration(
        &self,
        pr: &PullRequestRecord,
    ) -> Option<Duration> {
        let first = pr.reviewer_reviews().next()?;
        let last_approval = pr.reviewer_reviews().rev().find(|r| r.is_approval())?;

        Some(self.calendar.working_duration(
            last_approval.created_at.parse()?,
            first.created_at.parse()?,
        ))
    }

    /// From the first approval by someone else to the merge. Later
    /// approvals are ignored.
    pub fn first_approval_to_merge_duration(&self, pr: &PullRequestRecord) -> Option<Duration> {
        let approval = pr.reviewer_reviews().find(|r| r.is_approval())?;

        Some(
            self.calendar
                .working_duration(pr.merged_at.parse()?, approval.created_at.parse()?),
        )
    }
}
