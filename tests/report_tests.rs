use std::cell::RefCell;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use gh_metrics::error::MetricsError;
use gh_metrics::github::RepoSpec;
use gh_metrics::github::graphql::parse_search_page;
use gh_metrics::github::models::{PullRequestRecord, ResultPage};
use gh_metrics::metrics::{
    BusinessCalendar, COLUMN_HEADERS, DurationFormatter, MetricsExtractor, PullRequestSource,
    SearchQuery, build_report,
};
use gh_metrics::ui::table::render_csv;

const FIXTURE: &str = include_str!("fixtures/search_page.json");

/// Hands out canned pages in order and records the cursor of every call.
struct FakeSource {
    pages: RefCell<Vec<Result<ResultPage>>>,
    cursors: RefCell<Vec<Option<String>>>,
}

impl FakeSource {
    fn new(pages: Vec<Result<ResultPage>>) -> Self {
        Self {
            pages: RefCell::new(pages),
            cursors: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Option<String>> {
        self.cursors.borrow().clone()
    }
}

impl PullRequestSource for FakeSource {
    async fn fetch_page(&self, _query: &SearchQuery, after: Option<&str>) -> Result<ResultPage> {
        self.cursors.borrow_mut().push(after.map(String::from));
        let mut pages = self.pages.borrow_mut();
        if pages.is_empty() {
            return Err(anyhow!("no more pages"));
        }
        pages.remove(0)
    }
}

fn make_query(filter: Option<&str>) -> SearchQuery {
    SearchQuery {
        repo: RepoSpec::parse("testOwner/testRepo", "github.com").unwrap(),
        start: NaiveDate::from_ymd_opt(2022, 3, 18).unwrap(),
        end: NaiveDate::from_ymd_opt(2022, 3, 28).unwrap(),
        filter: filter.map(String::from),
        page_size: 50,
        review_limit: 50,
    }
}

fn make_pr(number: u64) -> PullRequestRecord {
    PullRequestRecord {
        author_login: "alice".into(),
        number,
        additions: 1,
        deletions: 1,
        changed_files: 1,
        created_at: "2022-03-21T10:00:00Z".into(),
        merged_at: "2022-03-21T11:00:00Z".into(),
        is_draft: false,
        participants_count: 1,
        comments_count: 0,
        commit_count: 0,
        reviews: vec![],
        commits: vec![],
        ready_for_review_at: None,
    }
}

fn page(numbers: &[u64], next: Option<&str>) -> ResultPage {
    ResultPage {
        records: numbers.iter().map(|n| make_pr(*n)).collect(),
        has_next_page: next.is_some(),
        end_cursor: next.map(String::from),
    }
}

fn fixture_page(has_next_page: bool) -> ResultPage {
    let data: serde_json::Value = serde_json::from_str(FIXTURE).unwrap();
    let mut page = parse_search_page(&data).unwrap();
    page.has_next_page = has_next_page;
    page
}

fn first_cells(report: &gh_metrics::metrics::Report) -> Vec<String> {
    report.rows.iter().map(|r| r.cells()[0].clone()).collect()
}

// --- Search string ---

#[test]
fn test_search_string() {
    assert_eq!(
        make_query(None).search_string(),
        "repo:testOwner/testRepo type:pr merged:2022-03-18..2022-03-28"
    );
}

#[test]
fn test_search_string_with_filter() {
    assert_eq!(
        make_query(Some("author:Batman")).search_string(),
        "repo:testOwner/testRepo type:pr merged:2022-03-18..2022-03-28 author:Batman"
    );
}

#[test]
fn test_search_string_blank_filter_is_trimmed() {
    assert_eq!(
        make_query(Some("   ")).search_string(),
        "repo:testOwner/testRepo type:pr merged:2022-03-18..2022-03-28"
    );
}

// --- Pagination ---

#[tokio::test]
async fn test_single_page() {
    let source = FakeSource::new(vec![Ok(page(&[1, 2], None))]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(true));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();

    assert_eq!(source.calls(), vec![None]);
    assert_eq!(first_cells(&report), vec!["1", "2"]);
    assert_eq!(report.headers, COLUMN_HEADERS.to_vec());
}

#[tokio::test]
async fn test_two_pages_in_order() {
    let source = FakeSource::new(vec![
        Ok(page(&[1, 2], Some("cursor-1"))),
        Ok(page(&[3], None)),
    ]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(true));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();

    assert_eq!(source.calls(), vec![None, Some("cursor-1".to_string())]);
    assert_eq!(first_cells(&report), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_cursor_ignored_on_last_page() {
    let mut last = page(&[7], None);
    last.end_cursor = Some("stale".into());
    let source = FakeSource::new(vec![Ok(last)]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(false));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();

    assert_eq!(source.calls().len(), 1);
    assert_eq!(report.rows.len(), 1);
}

#[tokio::test]
async fn test_empty_result() {
    let source = FakeSource::new(vec![Ok(page(&[], None))]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(false));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(report.headers.len(), 11);
}

#[tokio::test]
async fn test_failed_page_fails_report() {
    let source = FakeSource::new(vec![
        Ok(page(&[1], Some("cursor-1"))),
        Err(anyhow!("GitHub API returned 401 Unauthorized: Bad credentials")),
    ]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(false));

    let err = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap_err();

    assert_eq!(source.calls().len(), 2);
    let chain = format!("{err:#}");
    assert!(chain.contains("page 2"));
    assert!(chain.contains("Bad credentials"));
}

#[tokio::test]
async fn test_missing_cursor_is_an_error() {
    let mut broken = page(&[1], None);
    broken.has_next_page = true;
    let source = FakeSource::new(vec![Ok(broken)]);
    let cal = BusinessCalendar::default();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(false));

    let err = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<MetricsError>(),
        Some(MetricsError::MissingCursor)
    ));
    assert_eq!(source.calls().len(), 1);
}

// --- End to end ---

#[tokio::test]
async fn test_fixture_csv_rows() {
    let source = FakeSource::new(vec![Ok(fixture_page(false))]);
    let cal = BusinessCalendar::office_hours();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(true));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();
    let csv = render_csv(&report);

    assert!(csv.contains("5339,1,6,3,1,38:13,0,3,01:12,08:00,06:51\n"));
    assert!(csv.contains("5340,1,12,6,2,38:13,0,3,01:12,08:00,06:51\n"));
}

#[tokio::test]
async fn test_fixture_table_values() {
    let source = FakeSource::new(vec![Ok(fixture_page(false))]);
    let cal = BusinessCalendar::office_hours();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(false));

    let report = build_report(&source, &make_query(None), &extractor)
        .await
        .unwrap();

    assert_eq!(
        report.rows[0].cells(),
        ["5339", "1", "6", "3", "1", "38h13m", "0", "3", "1h12m", "8h0m", "6h51m"]
    );
}

#[tokio::test]
async fn test_fixture_with_pagination() {
    let source = FakeSource::new(vec![Ok(fixture_page(true)), Ok(fixture_page(false))]);
    let cal = BusinessCalendar::office_hours();
    let extractor = MetricsExtractor::new(&cal, DurationFormatter::new(true));

    let report = build_report(&source, &make_query(Some("author:Batman")), &extractor)
        .await
        .unwrap();

    assert_eq!(
        source.calls(),
        vec![None, Some("Y3Vyc29yOjI=".to_string())]
    );
    assert_eq!(first_cells(&report), vec!["5339", "5340", "5339", "5340"]);
}
