//! Dashboard orchestration.
//!
//! One render pass fetches both documents concurrently, then runs the
//! availability chart and both tables against a fresh page. A failed fetch
//! replaces the whole page content with a single error message.

use crate::availability::{aggregate, AggregateOptions, AvailabilityPoint};
use crate::config::ServerConfig;
use crate::data::{ChangeLog, StatusDocument};
use crate::render::{
    escape_html, render_change_table, render_chart, render_status_table, Page, RenderOutcome,
};
use crate::source::{fetch_document, Location, SourceError};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Dashboard error types.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{document}: {source}")]
    Fetch {
        document: &'static str,
        #[source]
        source: SourceError,
    },
}

/// Both documents of one render pass.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub status: StatusDocument,
    pub changes: ChangeLog,
}

/// Loads the status documents and renders the dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    status: Location,
    changes: Location,
    options: AggregateOptions,
}

impl Dashboard {
    pub fn new(status: Location, changes: Location, options: AggregateOptions) -> Self {
        Self {
            status,
            changes,
            options,
        }
    }

    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self::new(
            cfg.status_location(),
            cfg.changes_location(),
            cfg.aggregate_options(),
        )
    }

    /// Fetch both documents concurrently. The first failure wins.
    pub async fn load(&self) -> Result<DashboardData, DashboardError> {
        let (status, changes) = tokio::try_join!(
            async {
                fetch_document::<StatusDocument>(&self.status)
                    .await
                    .map_err(|source| DashboardError::Fetch {
                        document: "current status",
                        source,
                    })
            },
            async {
                fetch_document::<ChangeLog>(&self.changes)
                    .await
                    .map_err(|source| DashboardError::Fetch {
                        document: "status changes",
                        source,
                    })
            },
        )?;

        Ok(DashboardData { status, changes })
    }

    /// Availability series for the loaded change log.
    pub async fn availability(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityPoint>, DashboardError> {
        let data = self.load().await?;
        Ok(aggregate(&data.changes.changes, &self.options, now))
    }

    /// Fill the template's mount points from already loaded data.
    pub fn render(&self, data: &DashboardData, template: &str, now: DateTime<Utc>) -> String {
        let mut page = Page::new(template);

        let points = aggregate(&data.changes.changes, &self.options, now);
        if render_chart(&points, &mut page) == RenderOutcome::SurfaceAbsent {
            tracing::debug!("Dashboard: page has no chart mount point, skipping chart");
        }

        if render_status_table(&data.status, self.options.label_offset, &mut page)
            == RenderOutcome::SurfaceAbsent
        {
            tracing::debug!("Dashboard: page has no status table mount point");
        }

        if render_change_table(&data.changes.changes, self.options.label_offset, &mut page)
            == RenderOutcome::SurfaceAbsent
        {
            tracing::debug!("Dashboard: page has no change log mount point");
        }

        tracing::debug!(
            "Dashboard: rendered {} days, {} servers, {} changes",
            points.len(),
            data.status.servers.len(),
            data.changes.changes.len()
        );

        page.into_html()
    }

    /// Run one full render pass. Fetch failures yield the error message alone.
    pub async fn render_page(&self, template: &str, now: DateTime<Utc>) -> String {
        match self.load().await {
            Ok(data) => self.render(&data, template, now),
            Err(e) => {
                tracing::error!("Dashboard: failed to load data: {}", e);
                error_content(&e)
            }
        }
    }
}

/// Content shown in place of the dashboard when loading fails.
pub fn error_content(err: &DashboardError) -> String {
    format!(
        "<p class=\"load-error\">Failed to load data: {}</p>",
        escape_html(&err.to_string())
    )
}
