use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::github::models::ResultPage;

const EXTENSION: &str = "json";

/// A search page as written to disk, stamped with when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPage {
    pub fetched_at: DateTime<Utc>,
    pub page: ResultPage,
}

impl StoredPage {
    /// Fresh while `now` lies within `ttl` of the fetch. Entries stamped in
    /// the future are stale.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age >= Duration::zero() && age <= ttl
    }
}

/// One JSON file per page key inside `dir`. Knows nothing about expiry.
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File for `key`. Search strings carry spaces, colons and `..`, so
    /// anything outside `[A-Za-z0-9.-]` becomes `_`.
    fn file_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '.' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{stem}.{EXTENSION}"))
    }

    /// The stored page, if any. Unreadable entries are deleted.
    pub fn load(&self, key: &str) -> Option<StoredPage> {
        let file = self.file_for(key);
        let raw = fs::read(&file).ok()?;

        match serde_json::from_slice(&raw) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Dropping corrupt cached page");
                if let Err(e) = self.remove(key) {
                    warn!(file = %file.display(), error = %e, "Could not delete corrupt cached page");
                }
                None
            }
        }
    }

    /// Write `page` under `key`, stamped with the current time.
    pub fn save(&self, key: &str, page: &ResultPage) -> Result<()> {
        self.save_at(key, page, Utc::now())
    }

    pub fn save_at(&self, key: &str, page: &ResultPage, fetched_at: DateTime<Utc>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create cache directory {}", self.dir.display()))?;

        let stored = StoredPage {
            fetched_at,
            page: page.clone(),
        };
        let file = self.file_for(key);
        let raw = serde_json::to_vec(&stored).context("Cannot encode cached page")?;
        fs::write(&file, raw).with_context(|| format!("Cannot write {}", file.display()))?;

        debug!(file = %file.display(), records = page.records.len(), "Page cached");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key);
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Cannot delete {}", file.display())),
        }
    }

    /// Delete every cached page. A missing directory is already clear.
    pub fn clear(&self) -> Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Cannot list {}", self.dir.display()));
            }
        };

        let mut removed = 0usize;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                fs::remove_file(&path)
                    .with_context(|| format!("Cannot delete {}", path.display()))?;
                removed += 1;
            }
        }
        debug!(removed, "Page cache cleared");
        Ok(())
    }
}
