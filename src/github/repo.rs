use std::fmt;

use crate::error::MetricsError;

pub const DEFAULT_HOST: &str = "github.com";

/// A repository on a specific GitHub host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: String,
    pub name: String,
    pub host: String,
}

impl RepoSpec {
    /// Parse `OWNER/REPO` (using `default_host`) or `HOST/OWNER/REPO`.
    pub fn parse(input: &str, default_host: &str) -> Result<Self, MetricsError> {
        let parts: Vec<&str> = input.trim().split('/').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(MetricsError::InvalidRepository(input.to_string()));
        }

        match parts.as_slice() {
            [owner, name] => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
                host: default_host.to_string(),
            }),
            [host, owner, name] => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
                host: host.to_string(),
            }),
            _ => Err(MetricsError::InvalidRepository(input.to_string())),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// GraphQL endpoint for this repository's host.
    pub fn api_url(&self) -> String {
        if self.host.eq_ignore_ascii_case(DEFAULT_HOST) {
            "https://api.github.com/graphql".to_string()
        } else {
            format!("https://{}/api/graphql", self.host)
        }
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}

/// Host used when a repository is given without one: `GH_HOST`, then the
/// configured host, then github.com.
pub fn default_host(configured: Option<&str>) -> String {
    if let Ok(host) = std::env::var("GH_HOST")
        && !host.trim().is_empty()
    {
        return host.trim().to_string();
    }
    configured
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(DEFAULT_HOST)
        .to_string()
}
