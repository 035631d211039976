//! File-backed document source.

use std::path::Path;

use super::SourceError;

/// Read a document from disk.
pub async fn read_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    Ok(tokio::fs::read(path).await?)
}
