pub const MERGED_PRS_QUERY: &str = r#"
query($query: String!, $pageSize: Int!, $reviewLimit: Int!, $cursor: String) {
  search(query: $query, type: ISSUE, first: $pageSize, after: $cursor) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      ... on PullRequest {
        author { login }
        number
        additions
        deletions
        changedFiles
        createdAt
        mergedAt
        isDraft
        participants { totalCount }
        comments { totalCount }
        reviews(first: $reviewLimit, states: [APPROVED, CHANGES_REQUESTED, COMMENTED]) {
          nodes {
            author { login }
            createdAt
            state
          }
        }
        commits(first: 1) {
          totalCount
          nodes {
            commit { committedDate }
          }
        }
        timelineItems(itemTypes: [READY_FOR_REVIEW_EVENT], first: 1) {
          totalCount
          nodes {
            ... on ReadyForReviewEvent { createdAt }
          }
        }
      }
    }
  }
  rateLimit {
    remaining
    limit
    resetAt
  }
}
"#;
