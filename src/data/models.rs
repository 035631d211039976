//! Wire types for the current-status and change-log documents.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health state of a monitored server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerStatus {
    Up,
    Down,
    Unknown,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Up => "UP",
            ServerStatus::Down => "DOWN",
            ServerStatus::Unknown => "UNKNOWN",
        }
    }

    /// CSS class used to style the status cell.
    pub fn css_class(&self) -> &'static str {
        match self {
            ServerStatus::Up => "status-up",
            ServerStatus::Down => "status-down",
            ServerStatus::Unknown => "status-unknown",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded transition of a server between health states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub server_id: String,
    pub server_name: String,
    pub previous_status: ServerStatus,
    pub current_status: ServerStatus,
    pub changed_at: DateTime<Utc>,
    /// Response time in milliseconds at the moment of the change.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Latest check result for one server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatusEntry {
    pub server_id: String,
    pub status: ServerStatus,
    /// Response time in milliseconds, absent when the check failed.
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// The current-status document: server id to latest entry, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusDocument {
    pub servers: IndexMap<String, CurrentStatusEntry>,
}

impl StatusDocument {
    pub fn entries(&self) -> impl Iterator<Item = &CurrentStatusEntry> {
        self.servers.values()
    }
}

/// The change-log document. A missing `changes` field reads as an empty log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeLog {
    #[serde(default)]
    pub changes: Vec<StatusChangeEvent>,
}
