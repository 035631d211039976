//! Server checker.
//!
//! Polls every enabled server once, records status transitions against the
//! previous run, and writes the current-status and change-log documents the
//! dashboard reads.

mod http;
mod targets;

pub use http::*;
pub use targets::*;

use crate::data::{ChangeLog, CurrentStatusEntry, ServerStatus, StatusChangeEvent, StatusDocument};
use crate::source::{fetch_document, Location, SourceError};

use chrono::Utc;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the current-status document inside the data directory.
pub const CURRENT_STATUS_FILE: &str = "current-status.json";
/// File name of the change-log document inside the data directory.
pub const STATUS_CHANGES_FILE: &str = "status-changes.json";

/// Checker error types.
#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("failed to load server list {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: SourceError,
    },
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of one checker pass.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub results: StatusDocument,
    /// Transitions detected in this pass only.
    pub changes: Vec<StatusChangeEvent>,
}

impl CheckReport {
    pub fn up_count(&self) -> usize {
        self.results
            .entries()
            .filter(|e| e.status == ServerStatus::Up)
            .count()
    }

    pub fn down_count(&self) -> usize {
        self.results.servers.len() - self.up_count()
    }

    pub fn any_down(&self) -> bool {
        self.results
            .entries()
            .any(|e| e.status == ServerStatus::Down)
    }
}

/// Check one server and build its status entry.
pub async fn check_target(target: &ServerTarget, settings: &CheckSettings) -> CurrentStatusEntry {
    let timeout = target.timeout(settings);
    let result = run_http_check(&target.url, timeout, target.expected_status).await;
    let checked_at = Some(Utc::now());

    match result {
        Ok(response_time) => CurrentStatusEntry {
            server_id: target.id.clone(),
            status: ServerStatus::Up,
            response_time: Some(response_time),
            checked_at,
            error_message: None,
        },
        Err(e) => CurrentStatusEntry {
            server_id: target.id.clone(),
            status: ServerStatus::Down,
            response_time: e.response_time(),
            checked_at,
            error_message: Some(e.to_string()),
        },
    }
}

/// Read a data document, starting empty when it is absent or unreadable.
async fn load_or_default<T: DeserializeOwned + Default>(path: &Path, document: &str) -> T {
    match fetch_document(&Location::File(path.to_path_buf())).await {
        Ok(doc) => {
            tracing::info!("Checker: loaded {} from {}", document, path.display());
            doc
        }
        Err(SourceError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("Checker: no {} yet, starting a new one", document);
            T::default()
        }
        Err(e) => {
            tracing::error!("Checker: failed to load {}: {}", document, e);
            T::default()
        }
    }
}

/// Checks the configured servers and maintains the data documents.
pub struct Checker {
    targets: ServersFile,
    status_path: PathBuf,
    changes_path: PathBuf,
    current: StatusDocument,
    log: ChangeLog,
}

impl Checker {
    /// Load the server list and the previous run's documents.
    ///
    /// A missing or malformed server list is an error; missing or malformed
    /// data documents start out empty.
    pub async fn load(servers_file: &Path, data_dir: &Path) -> Result<Self, CheckerError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let targets: ServersFile = fetch_document(&Location::File(servers_file.to_path_buf()))
            .await
            .map_err(|source| CheckerError::Config {
                path: servers_file.display().to_string(),
                source,
            })?;
        tracing::info!("Checker: loaded {} servers", targets.servers.len());

        let status_path = data_dir.join(CURRENT_STATUS_FILE);
        let changes_path = data_dir.join(STATUS_CHANGES_FILE);
        let current = load_or_default(&status_path, "current status").await;
        let log = load_or_default(&changes_path, "status changes").await;

        Ok(Self {
            targets,
            status_path,
            changes_path,
            current,
            log,
        })
    }

    /// Check every enabled server in order and record status transitions.
    ///
    /// Servers absent from the previous run count as UNKNOWN. Disabled
    /// servers are skipped and drop out of the current status.
    pub async fn check_all(&mut self) -> CheckReport {
        tracing::info!("Checker: starting server checks");

        let mut report = CheckReport::default();

        for target in self.targets.servers.iter().filter(|t| t.enabled) {
            tracing::info!("Checking {} ({})", target.name, target.url);
            let entry = check_target(target, &self.targets.settings).await;

            let previous = self
                .current
                .servers
                .get(&target.id)
                .map(|e| e.status)
                .unwrap_or(ServerStatus::Unknown);

            if previous != entry.status {
                tracing::info!(
                    "Status change: {} {} → {}",
                    target.name,
                    previous,
                    entry.status
                );
                report.changes.push(StatusChangeEvent {
                    server_id: target.id.clone(),
                    server_name: target.name.clone(),
                    previous_status: previous,
                    current_status: entry.status,
                    changed_at: entry.checked_at.unwrap_or_else(Utc::now),
                    response_time: entry.response_time,
                    error_message: entry.error_message.clone(),
                });
            }

            report.results.servers.insert(target.id.clone(), entry);
        }

        self.current = report.results.clone();

        if !report.changes.is_empty() {
            self.log.changes.extend(report.changes.iter().cloned());
            tracing::info!("Checker: {} status changes recorded", report.changes.len());
        }

        report
    }

    /// Write the documents. The change log is only written once it has entries.
    pub async fn save(&self) -> Result<(), CheckerError> {
        tokio::fs::write(&self.status_path, serde_json::to_vec_pretty(&self.current)?).await?;

        if !self.log.changes.is_empty() {
            tokio::fs::write(&self.changes_path, serde_json::to_vec_pretty(&self.log)?).await?;
            tracing::info!("Checker: change log saved to {}", self.changes_path.display());
        }

        tracing::info!("Checker: results saved to {}", self.status_path.display());
        Ok(())
    }

    /// One full pass: check, save, log a summary.
    pub async fn run(&mut self) -> Result<CheckReport, CheckerError> {
        let report = self.check_all().await;
        self.save().await?;

        tracing::info!(
            "Checker: {} servers, {} up, {} down, {} changes",
            report.results.servers.len(),
            report.up_count(),
            report.down_count(),
            report.changes.len()
        );

        Ok(report)
    }
}
