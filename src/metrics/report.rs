use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use super::extractor::{COLUMN_HEADERS, MetricRow, MetricsExtractor};
use crate::error::MetricsError;
use crate::github::models::ResultPage;
use crate::github::repo::RepoSpec;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything needed to ask the platform for merged pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub repo: RepoSpec,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub filter: Option<String>,
    pub page_size: u32,
    pub review_limit: u32,
}

impl SearchQuery {
    /// The platform search string, e.g.
    /// `repo:octo/app type:pr merged:2022-03-18..2022-03-28 author:alice`.
    pub fn search_string(&self) -> String {
        let filter = self.filter.as_deref().unwrap_or_default();
        format!(
            "repo:{} type:pr merged:{}..{} {}",
            self.repo.full_name(),
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT),
            filter.trim(),
        )
        .trim()
        .to_string()
    }
}

/// Produces pages of merged pull requests, one request at a time.
#[allow(async_fn_in_trait)]
pub trait PullRequestSource {
    async fn fetch_page(&self, query: &SearchQuery, after: Option<&str>) -> Result<ResultPage>;
}

impl<S: PullRequestSource> PullRequestSource for &S {
    async fn fetch_page(&self, query: &SearchQuery, after: Option<&str>) -> Result<ResultPage> {
        (**self).fetch_page(query, after).await
    }
}

/// Header plus one row per pull request, in the order the pages arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl Report {
    pub fn new(rows: Vec<MetricRow>) -> Self {
        Self {
            headers: COLUMN_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

/// Walk every page of results, starting without a cursor and following
/// `end_cursor` until the source reports no further pages. Any fetch error
/// aborts the whole report.
pub async fn build_report<S: PullRequestSource>(
    source: &S,
    query: &SearchQuery,
    extractor: &MetricsExtractor<'_>,
) -> Result<Report> {
    let mut rows = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0u32;

    loop {
        page_number += 1;
        let page = source
            .fetch_page(query, cursor.as_deref())
            .await
            .with_context(|| format!("Failed to fetch page {page_number} of pull requests"))?;

        debug!(
            page = page_number,
            records = page.records.len(),
            has_next_page = page.has_next_page,
            "Fetched page"
        );
        rows.extend(page.records.iter().map(|pr| extractor.row(pr)));

        if !page.has_next_page {
            break;
        }
        cursor = Some(page.end_cursor.ok_or(MetricsError::MissingCursor)?);
    }

    info!(
        repo = %query.repo,
        pages = page_number,
        rows = rows.len(),
        "Report assembled"
    );
    Ok(Report::new(rows))
}
