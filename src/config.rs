//! Configuration module for statusboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::availability::{
    parse_offset, AggregateOptions, DayBoundary, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
use crate::source::Location;

use chrono::{FixedOffset, Offset, Utc};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Directory served under `/data` (default: "data")
    pub data_dir: String,
    /// Current-status document location (default: "data/current-status.json")
    pub status_url: String,
    /// Change-log document location (default: "data/status-changes.json")
    pub changes_url: String,
    /// Server list read by the checker (default: "data/servers.json")
    pub servers_file: String,
    /// Length of the availability window in days (default: 90)
    pub window_days: u32,
    /// Offset used to display dates and times (default: UTC)
    pub display_offset: FixedOffset,
    /// Calendar used to bucket events (default: UTC)
    pub day_boundary: DayBoundary,
    /// Slack incoming webhook for change notifications
    pub slack_webhook_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            data_dir: "data".to_string(),
            status_url: "data/current-status.json".to_string(),
            changes_url: "data/status-changes.json".to_string(),
            servers_file: "data/servers.json".to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
            display_offset: Utc.fix(),
            day_boundary: DayBoundary::Utc,
            slack_webhook_url: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STATUSBOARD_HTTP_PORT`: HTTP port (default: 8080)
    /// - `STATUSBOARD_DATA_DIR`: data directory (default: "data")
    /// - `STATUSBOARD_STATUS_URL`: current-status URL or path
    /// - `STATUSBOARD_CHANGES_URL`: change-log URL or path
    /// - `STATUSBOARD_SERVERS_FILE`: server list for the `check` command
    /// - `STATUSBOARD_WINDOW_DAYS`: availability window, at most 3660 (default: 90)
    /// - `STATUSBOARD_UTC_OFFSET`: display offset such as `+09:00` (default: UTC)
    /// - `STATUSBOARD_DAY_BOUNDARY`: `utc` or `display` (default: utc)
    /// - `SLACK_WEBHOOK_URL`: webhook for the `notify` command
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = lookup("STATUSBOARD_HTTP_PORT").and_then(|s| s.parse().ok()) {
            cfg.http_port = port;
        }

        if let Some(data_dir) = lookup("STATUSBOARD_DATA_DIR") {
            cfg.data_dir = data_dir;
        }

        if let Some(url) = lookup("STATUSBOARD_STATUS_URL") {
            cfg.status_url = url;
        }

        if let Some(url) = lookup("STATUSBOARD_CHANGES_URL") {
            cfg.changes_url = url;
        }

        if let Some(path) = lookup("STATUSBOARD_SERVERS_FILE") {
            cfg.servers_file = path;
        }

        if let Some(days) = lookup("STATUSBOARD_WINDOW_DAYS")
            .and_then(|s| s.parse().ok())
            .filter(|d| *d <= MAX_WINDOW_DAYS)
        {
            cfg.window_days = days;
        }

        if let Some(offset) = lookup("STATUSBOARD_UTC_OFFSET").and_then(|s| parse_offset(&s)) {
            cfg.display_offset = offset;
        }

        if let Some(boundary) = lookup("STATUSBOARD_DAY_BOUNDARY").and_then(|s| s.parse().ok()) {
            cfg.day_boundary = boundary;
        }

        cfg.slack_webhook_url = lookup("SLACK_WEBHOOK_URL").filter(|s| !s.is_empty());

        cfg
    }

    pub fn status_location(&self) -> Location {
        Location::parse(&self.status_url)
    }

    pub fn changes_location(&self) -> Location {
        Location::parse(&self.changes_url)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            window_days: self.window_days,
            label_offset: self.display_offset,
            day_boundary: self.day_boundary,
        }
    }
}
