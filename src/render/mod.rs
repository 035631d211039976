//! Rendering module: view models and the page surface they mount onto.

mod chart;
mod tables;

pub use chart::*;
pub use tables::*;

/// Mount point for the availability chart.
pub const CHART_MOUNT: &str = "uptime_chart";
/// Mount point for the current-status table body.
pub const STATUS_MOUNT: &str = "status_rows";
/// Mount point for the change-log table body.
pub const CHANGES_MOUNT: &str = "change_rows";

/// Result of mounting content onto a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The page has no such mount point; nothing was drawn.
    SurfaceAbsent,
}

/// An HTML page with `{{name}}` mount points.
#[derive(Debug, Clone)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            html: template.into(),
        }
    }

    fn placeholder(mount: &str) -> String {
        format!("{{{{{}}}}}", mount)
    }

    pub fn has_mount(&self, mount: &str) -> bool {
        self.html.contains(&Self::placeholder(mount))
    }

    /// Fill every occurrence of the mount point with `content`.
    pub fn mount(&mut self, mount: &str, content: &str) -> RenderOutcome {
        let placeholder = Self::placeholder(mount);
        if !self.html.contains(&placeholder) {
            return RenderOutcome::SurfaceAbsent;
        }
        self.html = self.html.replace(&placeholder, content);
        RenderOutcome::Rendered
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Escape text for use in HTML element content and attribute values.
///
/// Braces are escaped too, so mounted text can never form a `{{name}}`
/// mount point for a later pass.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}
