//! Data source module for loading the status documents.
//!
//! Supports HTTP(S) endpoints and local files.

mod file;
mod http;

pub use file::*;
pub use http::*;

use serde::de::DeserializeOwned;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Source error types.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(String),
    File(PathBuf),
}

impl Location {
    /// Anything that is not an `http://` or `https://` URL is a file path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Location::Http(s.to_string())
        } else {
            Location::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Http(url) => f.write_str(url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch a document and parse it as JSON.
pub async fn fetch_document<T: DeserializeOwned>(location: &Location) -> Result<T, SourceError> {
    let body = match location {
        Location::Http(url) => fetch_http(url).await?,
        Location::File(path) => read_file(path).await?,
    };

    Ok(serde_json::from_slice(&body)?)
}
