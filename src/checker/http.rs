//! HTTP health check.

use std::time::{Duration, Instant};
use thiserror::Error;

/// User agent sent with every check request.
pub const USER_AGENT: &str = "statusboard-checker/1.0";

/// Why a check did not come back UP. The display text is what gets recorded
/// as the server's error message.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("expected status code: {expected}, actual: {actual}")]
    UnexpectedStatus {
        expected: u16,
        actual: u16,
        response_time: f64,
    },
    #[error("timeout ({}s)", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("connection error")]
    Connect,
    #[error("request error: {0}")]
    Request(String),
}

impl CheckError {
    /// Response time, when a response arrived at all.
    pub fn response_time(&self) -> Option<f64> {
        match self {
            CheckError::UnexpectedStatus { response_time, .. } => Some(*response_time),
            _ => None,
        }
    }
}

fn map_error(e: reqwest::Error, timeout: Duration) -> CheckError {
    if e.is_timeout() {
        CheckError::Timeout(timeout)
    } else if e.is_connect() {
        CheckError::Connect
    } else {
        CheckError::Request(e.to_string())
    }
}

/// Milliseconds, rounded to two decimals.
fn elapsed_ms(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 100_000.0).round() / 100.0
}

/// GET `url` and compare the status code against `expected_status`.
///
/// Returns the response time in milliseconds on success.
pub async fn run_http_check(
    url: &str,
    timeout: Duration,
    expected_status: u16,
) -> Result<f64, CheckError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CheckError::Request(e.to_string()))?;

    let start = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| map_error(e, timeout))?;

    let status = response.status().as_u16();

    // Read the full body so the time covers the complete transfer
    let _body = response.bytes().await.map_err(|e| map_error(e, timeout))?;

    let response_time = elapsed_ms(start);

    if status != expected_status {
        return Err(CheckError::UnexpectedStatus {
            expected: expected_status,
            actual: status,
            response_time,
        });
    }

    Ok(response_time)
}
