use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use gh_metrics::cache::{CachedSource, PageStore};
use gh_metrics::github::{self, GithubClient, RepoSpec};
use gh_metrics::metrics::{DurationFormatter, MetricsExtractor, Report, SearchQuery, build_report};
use gh_metrics::ui::{self, OutputFormat};
use gh_metrics::util::config::AppConfig;
use gh_metrics::util::time::resolve_date_range;

#[derive(Parser, Debug)]
#[command(
    name = "gh-metrics",
    version,
    about = "Summary review and merge metrics for merged pull requests"
)]
struct Cli {
    /// Target repository as OWNER/REPO or HOST/OWNER/REPO
    #[arg(short = 'R', long)]
    repo: String,

    /// Start of the merged date range (YYYY-MM-DD)
    #[arg(short, long)]
    start: Option<String>,

    /// End of the merged date range (YYYY-MM-DD)
    #[arg(short, long)]
    end: Option<String>,

    /// Extra search qualifiers, e.g. "author:alice label:bug"
    #[arg(short, long)]
    query: Option<String>,

    /// Only count Monday to Friday in duration calculations
    #[arg(short = 'w', long)]
    only_weekdays: bool,

    /// Print output as CSV
    #[arg(short = 'C', long)]
    csv: bool,

    /// Pull requests fetched per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the response cache
    #[arg(long)]
    no_cache: bool,

    /// Clear cached responses before running
    #[arg(short, long)]
    refresh: bool,

    /// Enable debug logging to file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(page_size) = cli.page_size {
        config.report.page_size = page_size;
    }

    // Setup logging
    let _guard = setup_logging(&config, cli.debug)?;

    info!("gh-metrics starting");

    let host = github::repo::default_host(config.github.host.as_deref());
    let repo = RepoSpec::parse(&cli.repo, &host)?;
    let today = chrono::Utc::now().date_naive();
    let (start, end) = resolve_date_range(
        cli.start.as_deref(),
        cli.end.as_deref(),
        today,
        config.report.days_back,
    )?;
    let calendar = config.calendar.to_calendar(cli.only_weekdays)?;

    let query = SearchQuery {
        repo,
        start,
        end,
        filter: cli.query.clone(),
        page_size: config.report.page_size(),
        review_limit: config.report.review_limit(),
    };
    info!(search = %query.search_string(), "Querying merged pull requests");

    let token = github::auth::resolve_token(&query.repo.host)?;
    let api_url = config
        .github
        .api_url
        .clone()
        .unwrap_or_else(|| query.repo.api_url());
    let client = GithubClient::new(&token, &api_url, config.github.timeout())?;

    let extractor = MetricsExtractor::new(&calendar, DurationFormatter::new(cli.csv));
    let report = fetch_report(&config, &cli, client, &query, &extractor).await?;

    print!("{}", ui::render(&report, OutputFormat::from_csv_flag(cli.csv)));
    Ok(())
}

async fn fetch_report(
    config: &AppConfig,
    cli: &Cli,
    client: GithubClient,
    query: &SearchQuery,
    extractor: &MetricsExtractor<'_>,
) -> Result<Report> {
    if cli.no_cache || !config.cache.enabled {
        return build_report(&client, query, extractor).await;
    }

    let store = PageStore::new(config.cache_dir());
    if cli.refresh {
        store.clear().context("Failed to clear response cache")?;
    }
    let source = CachedSource::new(client, store, config.cache.ttl());
    build_report(&source, query, extractor).await
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if !debug {
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "gh-metrics.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("gh_metrics=debug")
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
