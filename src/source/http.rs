//! HTTP document source.

use super::SourceError;

/// Fetch a document body over HTTP.
///
/// Any non-success status is reported as [`SourceError::Status`].
pub async fn fetch_http(url: &str) -> Result<Vec<u8>, SourceError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SourceError::Transport(e.to_string()))?;

    Ok(body.to_vec())
}
