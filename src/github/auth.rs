use anyhow::{Result, bail};
use std::process::Command;
use tracing::debug;

/// Resolve a token for `host` using, in order:
/// 1. `gh auth token --hostname <host>`
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
pub fn resolve_token(host: &str) -> Result<String> {
    debug!(host = host, "Attempting to resolve token via `gh auth token`");
    if let Ok(output) = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        && output.status.success()
    {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!("Token resolved via gh CLI");
            return Ok(token);
        }
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var)
            && !token.is_empty()
        {
            debug!(var = var, "Token resolved via environment");
            return Ok(token);
        }
    }

    bail!(
        "Could not resolve a token for {host}. Please either:\n\
         - Run `gh auth login --hostname {host}`\n\
         - Set the GITHUB_TOKEN environment variable\n\
         - Set the GH_TOKEN environment variable"
    )
}
