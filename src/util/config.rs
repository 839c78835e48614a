use anyhow::{Context, Result};
use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::MetricsError;
use crate::metrics::calendar::{BusinessCalendar, Workdays};

const APP_NAME: &str = "gh-metrics";
const TIME_FORMAT: &str = "%H:%M:%S";
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    /// Per-request limit, covering connect through the full response body.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub only_weekdays: bool,
    #[serde(default = "default_workday_start")]
    pub workday_start: String,
    #[serde(default = "default_workday_end")]
    pub workday_end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_size")]
    pub review_limit: u32,
    #[serde(default = "default_days_back")]
    pub days_back: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    5
}
fn default_workday_start() -> String {
    "00:00:00".to_string()
}
fn default_workday_end() -> String {
    "23:59:59".to_string()
}
fn default_page_size() -> u32 {
    50
}
fn default_days_back() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_cache_ttl() -> u64 {
    900
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            only_weekdays: false,
            workday_start: default_workday_start(),
            workday_end: default_workday_end(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            review_limit: default_page_size(),
            days_back: default_days_back(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl(),
            dir: None,
        }
    }
}

impl CalendarConfig {
    /// Build the calendar; `force_weekdays` comes from `--only-weekdays`.
    pub fn to_calendar(&self, force_weekdays: bool) -> Result<BusinessCalendar, MetricsError> {
        let workdays = if self.only_weekdays || force_weekdays {
            Workdays::Weekdays
        } else {
            Workdays::AllDays
        };
        BusinessCalendar::new(
            workdays,
            parse_time(&self.workday_start)?,
            parse_time(&self.workday_end)?,
        )
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, MetricsError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| MetricsError::InvalidWorkday(format!("{value:?} is not HH:MM:SS")))
}

impl ReportConfig {
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn review_limit(&self) -> u32 {
        self.review_limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        // Search candidate paths in order
        let mut candidates = Vec::new();

        // 1. ~/.config/gh-metrics/config.toml (standard XDG on all platforms)
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config").join(APP_NAME).join("config.toml"));
        }

        // 2. Platform-specific path from `directories` crate
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        match candidates.iter().find(|p| p.exists()) {
            Some(config_path) => Self::read(config_path),
            None => Ok(AppConfig::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn cache_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.cache.dir {
            return dir.clone();
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.cache_dir().to_path_buf();
        }
        PathBuf::from(".cache").join(APP_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share").join(APP_NAME).join("logs")
    }
}
