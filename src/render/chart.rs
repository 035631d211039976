//! Availability bar chart.
//!
//! Produces a Chart.js configuration; the browser-side bootstrap in
//! `assets/dashboard.js` reads it from the page and draws the canvas.

use crate::availability::AvailabilityPoint;

use super::{Page, RenderOutcome, CHART_MOUNT};
use serde::Serialize;

/// DOM id of the chart canvas.
pub const CHART_CANVAS_ID: &str = "uptime-chart";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<BarDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataset {
    pub label: &'static str,
    pub data: Vec<u32>,
    pub background_color: Vec<&'static str>,
    pub border_color: Vec<&'static str>,
    pub border_width: u32,
    pub border_radius: u32,
    pub bar_thickness: u32,
    pub max_bar_thickness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: ChartPlugins,
    pub scales: ChartScales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlugins {
    pub legend: Toggle,
    pub tooltip: TooltipOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub display: bool,
}

/// Tooltip settings. `showValue: false` makes the bootstrap script suppress
/// the numeric line so only the date label is shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub enabled: bool,
    pub show_value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartScales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// Map the availability series onto bar-chart settings.
pub fn chart_spec(points: &[AvailabilityPoint]) -> ChartSpec {
    let colors: Vec<&'static str> = points.iter().map(|p| p.severity.color()).collect();

    ChartSpec {
        kind: "bar",
        data: ChartData {
            labels: points.iter().map(|p| p.label.clone()).collect(),
            datasets: vec![BarDataset {
                label: "Availability (%)",
                data: points.iter().map(|p| p.bar_height).collect(),
                background_color: colors.clone(),
                border_color: colors,
                border_width: 0,
                border_radius: 2,
                bar_thickness: 6,
                max_bar_thickness: 8,
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: ChartPlugins {
                legend: Toggle { display: false },
                tooltip: TooltipOptions {
                    enabled: true,
                    show_value: false,
                },
            },
            scales: ChartScales {
                x: Axis {
                    display: false,
                    min: None,
                    max: None,
                },
                y: Axis {
                    display: false,
                    min: Some(0),
                    max: Some(100),
                },
            },
        },
    }
}

/// Mount the chart onto the page, or report that the page has no chart slot.
pub fn render_chart(points: &[AvailabilityPoint], page: &mut Page) -> RenderOutcome {
    if !page.has_mount(CHART_MOUNT) {
        return RenderOutcome::SurfaceAbsent;
    }

    let config = serde_json::to_string(&chart_spec(points))
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c");

    let content = format!(
        "<canvas id=\"{id}\"></canvas>\n<script type=\"application/json\" id=\"{id}-config\">{config}</script>",
        id = CHART_CANVAS_ID,
        config = config,
    );

    page.mount(CHART_MOUNT, &content)
}
