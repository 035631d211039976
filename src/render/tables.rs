//! Current-status and change-log tables.

use crate::availability::local_timestamp;
use crate::data::{ServerStatus, StatusChangeEvent, StatusDocument};

use super::{escape_html, Page, RenderOutcome, CHANGES_MOUNT, STATUS_MOUNT};
use chrono::FixedOffset;

/// Number of change events shown in the change log.
pub const CHANGE_LOG_LIMIT: usize = 20;

const PLACEHOLDER: &str = "-";

/// One row of the current-status table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRow {
    pub server_id: String,
    pub status: ServerStatus,
    pub response_time: String,
    pub checked_at: String,
}

impl StatusRow {
    pub fn to_html(&self) -> String {
        format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&self.server_id),
            self.status.css_class(),
            self.status,
            escape_html(&self.response_time),
            escape_html(&self.checked_at),
        )
    }
}

/// One row of the change-log table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRow {
    pub server_name: String,
    pub previous_status: ServerStatus,
    pub current_status: ServerStatus,
    pub changed_at: String,
    pub error_message: String,
}

impl ChangeRow {
    pub fn to_html(&self) -> String {
        format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&self.server_name),
            self.previous_status,
            self.current_status,
            escape_html(&self.changed_at),
            escape_html(&self.error_message),
        )
    }
}

/// Rows for every server, in document order.
pub fn status_rows(doc: &StatusDocument, offset: FixedOffset) -> Vec<StatusRow> {
    doc.entries()
        .map(|entry| StatusRow {
            server_id: entry.server_id.clone(),
            status: entry.status,
            response_time: entry
                .response_time
                .map(|ms| ms.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            checked_at: entry
                .checked_at
                .map(|t| local_timestamp(t, offset))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        })
        .collect()
}

/// The last `limit` changes, newest first.
///
/// The log is taken to be in chronological order already.
pub fn change_rows(
    changes: &[StatusChangeEvent],
    offset: FixedOffset,
    limit: usize,
) -> Vec<ChangeRow> {
    let start = changes.len().saturating_sub(limit);

    changes[start..]
        .iter()
        .rev()
        .map(|change| ChangeRow {
            server_name: change.server_name.clone(),
            previous_status: change.previous_status,
            current_status: change.current_status,
            changed_at: local_timestamp(change.changed_at, offset),
            error_message: change.error_message.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn render_status_table(
    doc: &StatusDocument,
    offset: FixedOffset,
    page: &mut Page,
) -> RenderOutcome {
    let rows: String = status_rows(doc, offset)
        .iter()
        .map(StatusRow::to_html)
        .collect::<Vec<_>>()
        .join("\n");

    page.mount(STATUS_MOUNT, &rows)
}

pub fn render_change_table(
    changes: &[StatusChangeEvent],
    offset: FixedOffset,
    page: &mut Page,
) -> RenderOutcome {
    let rows: String = change_rows(changes, offset, CHANGE_LOG_LIMIT)
        .iter()
        .map(ChangeRow::to_html)
        .collect::<Vec<_>>()
        .join("\n");

    page.mount(CHANGES_MOUNT, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CurrentStatusEntry;
    use chrono::{Duration as ChronoDuration, Offset, TimeZone, Utc};

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn change(i: i64) -> StatusChangeEvent {
        StatusChangeEvent {
            server_id: format!("srv-{}", i),
            server_name: format!("Server {}", i),
            previous_status: ServerStatus::Up,
            current_status: ServerStatus::Down,
            changed_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
                + ChronoDuration::hours(i),
            response_time: None,
            error_message: if i % 2 == 0 { Some("timeout (10s)".to_string()) } else { None },
        }
    }

    #[test]
    fn test_status_rows_placeholders() {
        let mut doc = StatusDocument::default();
        doc.servers.insert(
            "api".to_string(),
            CurrentStatusEntry {
                server_id: "api".to_string(),
                status: ServerStatus::Up,
                response_time: Some(123.45),
                checked_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 15, 30, 0).unwrap()),
                error_message: None,
            },
        );
        doc.servers.insert(
            "db".to_string(),
            CurrentStatusEntry {
                server_id: "db".to_string(),
                status: ServerStatus::Down,
                response_time: None,
                checked_at: None,
                error_message: Some("connection error".to_string()),
            },
        );

        let rows = status_rows(&doc, FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].response_time, "123.45");
        assert_eq!(rows[0].checked_at, "2024-05-02 00:30:00");
        assert_eq!(rows[1].response_time, "-");
        assert_eq!(rows[1].checked_at, "-");

        let html = rows[1].to_html();
        assert!(html.contains("<td class=\"status-down\">DOWN</td>"));
    }

    #[test]
    fn test_change_rows_last_twenty_reversed() {
        let changes: Vec<_> = (0..25).map(change).collect();
        let rows = change_rows(&changes, utc(), CHANGE_LOG_LIMIT);

        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].server_name, "Server 24");
        assert_eq!(rows[19].server_name, "Server 5");
        assert_eq!(rows[0].error_message, "timeout (10s)");
        assert_eq!(rows[1].error_message, "");
    }

    #[test]
    fn test_change_rows_short_log() {
        let changes: Vec<_> = (0..3).map(change).collect();
        let rows = change_rows(&changes, utc(), CHANGE_LOG_LIMIT);
        let names: Vec<_> = rows.iter().map(|r| r.server_name.as_str()).collect();
        assert_eq!(names, vec!["Server 2", "Server 1", "Server 0"]);

        assert!(change_rows(&[], utc(), CHANGE_LOG_LIMIT).is_empty());
    }

    #[test]
    fn test_change_row_escapes_text() {
        let mut event = change(0);
        event.server_name = "<script>".to_string();
        let rows = change_rows(&[event], utc(), CHANGE_LOG_LIMIT);
        assert!(rows[0].to_html().contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_tables_without_mounts() {
        let mut page = Page::new("<p>empty</p>");
        assert_eq!(
            render_status_table(&StatusDocument::default(), utc(), &mut page),
            RenderOutcome::SurfaceAbsent
        );
        assert_eq!(
            render_change_table(&[], utc(), &mut page),
            RenderOutcome::SurfaceAbsent
        );
    }
}
