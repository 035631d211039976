//! HTTP request handlers.

use super::AppState;
use crate::dashboard::Dashboard;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use rust_embed::RustEmbed;

// ============================================================================
// Templates
// ============================================================================

const DASHBOARD_TEMPLATE: &str = include_str!("templates/dashboard.html");
const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");

/// Static assets bundled into the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Render the complete dashboard document for one page load.
pub async fn render_document(dashboard: &Dashboard, window_days: u32, now: DateTime<Utc>) -> String {
    let template = DASHBOARD_TEMPLATE.replace("{{window_days}}", &window_days.to_string());
    let content = dashboard.render_page(&template, now).await;

    LAYOUT_TEMPLATE
        .replace("{{title}}", "Server Status")
        .replace("{{content}}", &content)
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn handle_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    Html(render_document(&state.dashboard, state.config.window_days, Utc::now()).await)
}

// ============================================================================
// API
// ============================================================================

pub async fn handle_get_availability(State(state): State<AppState>) -> impl IntoResponse {
    match state.dashboard.availability(Utc::now()).await {
        Ok(points) => Json(points).into_response(),
        Err(e) => {
            tracing::error!("Availability request failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_asset(Path(path): Path<String>) -> impl IntoResponse {
    match Assets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}

pub async fn handle_favicon() -> impl IntoResponse {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <rect x="10" y="20" width="12" height="60" rx="2" fill="#22c55e"/>
        <rect x="30" y="20" width="12" height="60" rx="2" fill="#22c55e"/>
        <rect x="50" y="20" width="12" height="60" rx="2" fill="#f59e0b"/>
        <rect x="70" y="20" width="12" height="60" rx="2" fill="#22c55e"/>
    </svg>"##;

    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}
