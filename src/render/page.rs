use super::assets::{SCRIPT, STYLESHEET};
use super::components::{detail_pane, preview_list, report_summary, search_form};
use super::{escape, LinkStyle};
use crate::detail::DetailState;
use crate::model::{Report, TestPreview, TestStatus};
use std::collections::BTreeMap;

/// Everything a full page needs, already loaded and filtered.
pub struct PageView<'a> {
    pub links: LinkStyle,
    pub report: Option<&'a Report>,
    pub list_error: Option<&'a str>,
    pub previews: Vec<&'a TestPreview>,
    pub counts: BTreeMap<TestStatus, usize>,
    pub search: &'a str,
    pub status: Option<TestStatus>,
    pub selected_id: Option<&'a str>,
    pub detail: &'a DetailState,
    /// Reload when the session selection or its detail changes.
    pub follows_selection: bool,
    pub origin: &'a str,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let title = view
        .report
        .map(|r| r.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("Test run report");

    let base = view
        .links
        .base_href()
        .map(|href| format!(r#"<base href="{}">"#, href))
        .unwrap_or_default();

    let summary = match view.report {
        Some(report) => report_summary(report, &view.counts),
        None => r#"<header class="summary"><h1>Test run report</h1></header>"#.to_string(),
    };

    let list_error = view
        .list_error
        .map(|e| {
            format!(
                r#"<div class="error error--list"><p>Could not load the test list</p><pre class="error__reason">{}</pre></div>"#,
                escape(e)
            )
        })
        .unwrap_or_default();

    let list = if view.report.is_none() && view.list_error.is_none() {
        r#"<p class="previews previews--loading">Loading…</p>"#.to_string()
    } else {
        preview_list(
            &view.previews,
            view.links,
            view.selected_id,
            view.search,
            view.status,
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
{base}
<title>{title}</title>
<link rel="stylesheet" href="{css}">
</head>
<body data-live="{live}" data-follows-selection="{follows}">
{summary}
<div class="layout">
<aside class="sidebar">
{search}
{list_error}
{list}
</aside>
<main class="details">
{detail}
</main>
</div>
<footer class="footer">Report source: {origin}</footer>
<script src="{js}"></script>
</body>
</html>
"#,
        base = base,
        title = escape(title),
        css = view.links.asset_href(STYLESHEET),
        js = view.links.asset_href(SCRIPT),
        live = view.links.live_updates(),
        follows = view.links.live_updates() && view.follows_selection,
        summary = summary,
        search = search_form(view.links, view.search, view.status),
        list_error = list_error,
        list = list,
        detail = detail_pane(view.detail),
        origin = escape(view.origin),
    )
}
