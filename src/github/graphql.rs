use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::models::*;
use super::queries;
use crate::error::MetricsError;
use crate::metrics::report::{PullRequestSource, SearchQuery};

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: &str, api_url: &str, timeout: Duration) -> Result<Self> {
        if !api_url.starts_with("https://") {
            bail!("GitHub API URL must use HTTPS: {}", api_url);
        }

        let client = Client::builder()
            .user_agent(concat!("gh-metrics/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            token: token.to_string(),
        })
    }

    async fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let body = json!({
            "query": query,
            "variables": variables,
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("GitHub API request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("Failed to read GitHub response")?;
        read_response(status, &text)
    }
}

impl PullRequestSource for GithubClient {
    async fn fetch_page(&self, query: &SearchQuery, after: Option<&str>) -> Result<ResultPage> {
        let data = self
            .query(queries::MERGED_PRS_QUERY, search_variables(query, after))
            .await?;
        let rate_limit = extract_rate_limit(&data);
        let page = parse_search_page(&data)?;

        debug!(
            cursor = after.unwrap_or(""),
            count = page.records.len(),
            remaining = rate_limit.remaining,
            limit = rate_limit.limit,
            "Search page fetched"
        );
        Ok(page)
    }
}

/// Variables for `MERGED_PRS_QUERY`. `cursor` is `null` on the first page.
pub fn search_variables(query: &SearchQuery, after: Option<&str>) -> Value {
    json!({
        "query": query.search_string(),
        "pageSize": query.page_size,
        "reviewLimit": query.review_limit,
        "cursor": after,
    })
}

/// Decode a GraphQL HTTP response. Non-2xx statuses become
/// `MetricsError::Api` with the raw body attached.
pub fn read_response(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(MetricsError::Api {
            status: status.as_u16(),
            body: body.to_string(),
        }
        .into());
    }

    let data: Value = serde_json::from_str(body).context("Failed to parse GitHub response")?;
    check_graphql_errors(&data)?;
    Ok(data)
}

/// Fail on a GraphQL `errors` array, reporting the first message.
pub fn check_graphql_errors(data: &Value) -> Result<(), MetricsError> {
    if let Some(errors) = data.get("errors") {
        let error_msg = errors
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown GraphQL error");
        return Err(MetricsError::GraphQl(error_msg.to_string()));
    }
    Ok(())
}

pub fn extract_rate_limit(data: &Value) -> RateLimit {
    let rl = &data["data"]["rateLimit"];
    RateLimit {
        remaining: rl["remaining"].as_u64().unwrap_or(0) as u32,
        limit: rl["limit"].as_u64().unwrap_or(0) as u32,
        reset_at: rl["resetAt"].as_str().and_then(|s| s.parse().ok()),
    }
}

/// Translate a search response body into a `ResultPage`. Nodes that are
/// not pull requests are skipped.
pub fn parse_search_page(data: &Value) -> Result<ResultPage> {
    let search_data = &data["data"]["search"];
    let nodes = search_data["nodes"]
        .as_array()
        .context("Missing search nodes")?;

    let records = nodes
        .iter()
        .filter(|node| node.get("number").is_some())
        .map(parse_pull_request)
        .collect();

    let page_info = &search_data["pageInfo"];
    Ok(ResultPage {
        records,
        has_next_page: page_info["hasNextPage"].as_bool().unwrap_or(false),
        end_cursor: page_info["endCursor"].as_str().map(|s| s.to_string()),
    })
}

pub fn parse_pull_request(node: &Value) -> PullRequestRecord {
    let reviews = node["reviews"]["nodes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|r| ReviewEvent {
                    author_login: author_login(r),
                    created_at: timestamp(&r["createdAt"]),
                    state: ReviewState::from_wire(r["state"].as_str().unwrap_or("")),
                })
                .collect()
        })
        .unwrap_or_default();

    let commits = node["commits"]["nodes"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|c| CommitEvent {
                    committed_at: timestamp(&c["commit"]["committedDate"]),
                })
                .collect()
        })
        .unwrap_or_default();

    let ready_for_review_at = node["timelineItems"]["nodes"]
        .as_array()
        .and_then(|arr| arr.first())
        .map(|event| timestamp(&event["createdAt"]));

    PullRequestRecord {
        author_login: author_login(node),
        number: count(&node["number"]),
        additions: count(&node["additions"]),
        deletions: count(&node["deletions"]),
        changed_files: count(&node["changedFiles"]),
        created_at: timestamp(&node["createdAt"]),
        merged_at: timestamp(&node["mergedAt"]),
        is_draft: node["isDraft"].as_bool().unwrap_or(false),
        participants_count: count(&node["participants"]["totalCount"]),
        comments_count: count(&node["comments"]["totalCount"]),
        commit_count: count(&node["commits"]["totalCount"]),
        reviews,
        commits,
        ready_for_review_at,
    }
}

fn author_login(node: &Value) -> String {
    node["author"]["login"]
        .as_str()
        .unwrap_or("ghost")
        .to_string()
}

fn timestamp(value: &Value) -> Timestamp {
    Timestamp::new(value.as_str().unwrap_or(""))
}

fn count(value: &Value) -> u64 {
    value.as_u64().unwrap_or(0)
}
