use std::collections::BTreeMap;

use super::{escape, LinkStyle};
use crate::config::attachment_path;
use crate::detail::DetailState;
use crate::format::{format_ms, format_timestamp};
use crate::model::{Report, Test, TestAttachment, TestPreview, TestStatus, TestStep};

pub const NO_STACK_TRACE: &str = "No stack trace available";
pub const NO_TESTS: &str = "No tests match the current filter";

pub fn status_label(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Passed => "Passed",
        TestStatus::Failed => "Failed",
        TestStatus::Skipped => "Skipped",
        TestStatus::Invalid => "Invalid",
        TestStatus::Broken => "Broken",
        TestStatus::Blocked => "Blocked",
        TestStatus::Muted => "Muted",
    }
}

pub fn status_variant(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Passed => "success",
        TestStatus::Failed => "danger",
        TestStatus::Broken | TestStatus::Invalid => "warning",
        TestStatus::Skipped | TestStatus::Blocked => "neutral",
        TestStatus::Muted => "muted",
    }
}

pub fn status_badge(status: TestStatus) -> String {
    format!(
        r#"<span class="badge badge--{}" data-status="{}">{}</span>"#,
        status_variant(status),
        status.as_str(),
        status_label(status)
    )
}

/// Link target of an attachment, relative to the report root.
pub fn attachment_href(attachment: &TestAttachment) -> String {
    attachment_path(&attachment.id, &attachment.file_name)
}

pub fn attachment_link(attachment: &TestAttachment) -> String {
    let mime = if attachment.mime_type.is_empty() {
        String::new()
    } else {
        format!(
            r#" <span class="attachment__mime">{}</span>"#,
            escape(&attachment.mime_type)
        )
    };
    format!(
        r#"<a class="attachment" href="{}" target="_blank" rel="noopener">{}</a>{}"#,
        escape(&attachment_href(attachment)),
        escape(&attachment.file_name),
        mime
    )
}

pub fn attachment_list(attachments: &[TestAttachment]) -> String {
    if attachments.is_empty() {
        return String::new();
    }
    let items: String = attachments
        .iter()
        .map(|a| format!("<li>{}</li>", attachment_link(a)))
        .collect();
    format!(r#"<ul class="attachments">{}</ul>"#, items)
}

pub fn stack_trace_panel(stacktrace: Option<&str>) -> String {
    match stacktrace.filter(|s| !s.trim().is_empty()) {
        Some(text) => format!(r#"<pre class="stacktrace">{}</pre>"#, escape(text)),
        None => format!(
            r#"<p class="stacktrace stacktrace--empty">{}</p>"#,
            NO_STACK_TRACE
        ),
    }
}

pub fn preview_item(preview: &TestPreview, href: &str, active: bool) -> String {
    let class = if active {
        "preview preview--active"
    } else {
        "preview"
    };
    let thread = if preview.thread.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="preview__thread">{}</span>"#,
            escape(&preview.thread)
        )
    };
    format!(
        r#"<li class="{}" data-title="{}" data-status="{}"><a href="{}">{}<span class="preview__title">{}</span><span class="preview__duration">{}</span>{}</a></li>"#,
        class,
        escape(&preview.title),
        preview.status.as_str(),
        escape(href),
        status_badge(preview.status),
        escape(&preview.title),
        format_ms(preview.duration),
        thread
    )
}

pub fn preview_list(
    previews: &[&TestPreview],
    links: LinkStyle,
    active_id: Option<&str>,
    search: &str,
    status: Option<TestStatus>,
) -> String {
    if previews.is_empty() {
        return format!(r#"<p class="previews previews--empty">{}</p>"#, NO_TESTS);
    }
    let status_param = status.map(|s| s.as_str());
    let items: String = previews
        .iter()
        .map(|p| {
            let href = links.test_href(&p.id, search, status_param);
            preview_item(p, &href, active_id == Some(p.id.as_str()))
        })
        .collect();
    format!(r#"<ul class="previews">{}</ul>"#, items)
}

/// Recursive step tree; order follows the record, each node collapsible.
pub fn step_tree(steps: &[TestStep]) -> String {
    if steps.is_empty() {
        return String::new();
    }
    let items: String = steps.iter().map(step_node).collect();
    format!(r#"<ol class="steps">{}</ol>"#, items)
}

fn step_node(step: &TestStep) -> String {
    let expected = match step.data.expected_result.as_deref() {
        Some(text) if !text.trim().is_empty() => format!(
            r#"<p class="step__expected"><strong>Expected:</strong> {}</p>"#,
            escape(text)
        ),
        _ => String::new(),
    };
    let action = if step.data.action.is_empty() {
        escape(&step.step_type)
    } else {
        escape(&step.data.action)
    };
    format!(
        r#"<li class="step" data-step-id="{}"><details open><summary>{}<span class="step__action">{}</span><span class="step__duration">{}</span></summary>{}{}{}</details></li>"#,
        escape(&step.id),
        status_badge(step.execution.status),
        action,
        format_ms(step.execution.duration),
        expected,
        attachment_list(&step.attachments),
        step_tree(&step.steps)
    )
}

fn params_table(params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rows: String = params
        .iter()
        .map(|(k, v)| format!("<tr><th>{}</th><td>{}</td></tr>", escape(k), escape(v)))
        .collect();
    format!(
        r#"<section class="panel"><h3>Parameters</h3><table class="params">{}</table></section>"#,
        rows
    )
}

pub fn test_detail(test: &Test) -> String {
    let exec = &test.execution;
    let thread = exec
        .thread
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| format!("<dt>Thread</dt><dd>{}</dd>", escape(t)))
        .unwrap_or_default();
    let description = test
        .fields
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| {
            format!(
                r#"<section class="panel"><h3>Description</h3><p class="description">{}</p></section>"#,
                escape(d)
            )
        })
        .unwrap_or_default();
    let message = test
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(|m| {
            format!(
                r#"<section class="panel panel--error"><h3>Message</h3><pre class="message">{}</pre></section>"#,
                escape(m)
            )
        })
        .unwrap_or_default();
    let steps = if test.steps.is_empty() {
        r#"<p class="steps steps--empty">No steps recorded</p>"#.to_string()
    } else {
        step_tree(&test.steps)
    };
    let attachments = if test.attachments.is_empty() {
        r#"<p class="attachments attachments--empty">No attachments</p>"#.to_string()
    } else {
        attachment_list(&test.attachments)
    };

    format!(
        r#"<article class="detail" data-test-id="{id}">
<header class="detail__header"><h2>{title}</h2>{badge}</header>
<dl class="detail__timing"><dt>Started</dt><dd>{start}</dd><dt>Finished</dt><dd>{end}</dd><dt>Duration</dt><dd>{duration}</dd>{thread}</dl>
{description}{message}{params}
<section class="panel"><h3>Steps</h3>{steps}</section>
<section class="panel"><h3>Attachments</h3>{attachments}</section>
<section class="panel"><h3>Stack trace</h3>{stacktrace}</section>
</article>"#,
        id = escape(&test.id),
        title = escape(&test.title),
        badge = status_badge(exec.status),
        start = format_timestamp(exec.start_time),
        end = format_timestamp(exec.end_time),
        duration = format_ms(exec.duration),
        thread = thread,
        description = description,
        message = message,
        params = params_table(&test.params),
        steps = steps,
        attachments = attachments,
        stacktrace = stack_trace_panel(exec.stacktrace.as_deref()),
    )
}

pub fn detail_pane(state: &DetailState) -> String {
    match state {
        DetailState::Idle => {
            r#"<p class="detail detail--idle">Select a test to see its details</p>"#.to_string()
        }
        DetailState::Loading { id } => format!(
            r#"<p class="detail detail--loading" data-test-id="{}">Loading…</p>"#,
            escape(id)
        ),
        DetailState::Loaded { test, .. } => test_detail(test),
        DetailState::Failed { id, error } => format!(
            r#"<div class="detail detail--failed" data-test-id="{}"><p class="error">Could not load test details</p><pre class="error__reason">{}</pre></div>"#,
            escape(id),
            escape(error)
        ),
    }
}

pub fn report_summary(report: &Report, counts: &BTreeMap<TestStatus, usize>) -> String {
    let title = if report.title.is_empty() {
        "Test run report"
    } else {
        report.title.as_str()
    };
    let total: usize = counts.values().sum();
    let stats: String = counts
        .iter()
        .map(|(status, count)| {
            format!(
                r#"<li class="stat stat--{}">{} <strong>{}</strong></li>"#,
                status_variant(*status),
                status_label(*status),
                count
            )
        })
        .collect();
    format!(
        r#"<header class="summary"><h1>{}</h1><p class="summary__window">{} → {} · {}</p>{}<ul class="summary__stats"><li class="stat">Total <strong>{}</strong></li>{}</ul></header>"#,
        escape(title),
        format_timestamp(report.execution.start_time),
        format_timestamp(report.execution.end_time),
        format_ms(report.execution.duration),
        run_context(report),
        total,
        stats
    )
}

/// Environment, host, and thread count; empty when the report has none.
fn run_context(report: &Report) -> String {
    let mut entries = Vec::new();
    if let Some(env) = report.environment.as_deref().filter(|e| !e.is_empty()) {
        entries.push(format!("<dt>Environment</dt><dd>{}</dd>", escape(env)));
    }
    if let Some(host) = &report.host_data {
        let parts: Vec<&str> = [&host.node, &host.system, &host.machine, &host.arch]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        if !parts.is_empty() {
            entries.push(format!("<dt>Host</dt><dd>{}</dd>", escape(&parts.join(" · "))));
        }
    }
    if !report.threads.is_empty() {
        entries.push(format!("<dt>Threads</dt><dd>{}</dd>", report.threads.len()));
    }
    if entries.is_empty() {
        return String::new();
    }
    format!(r#"<dl class="summary__context">{}</dl>"#, entries.concat())
}

pub fn search_form(links: LinkStyle, search: &str, status: Option<TestStatus>) -> String {
    let options: String = std::iter::once(("".to_string(), "All statuses"))
        .chain(
            TestStatus::ALL
                .iter()
                .map(|s| (s.as_str().to_string(), status_label(*s))),
        )
        .map(|(value, label)| {
            let selected = status.map(|s| s.as_str()) == Some(value.as_str())
                || (status.is_none() && value.is_empty());
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                value,
                if selected { " selected" } else { "" },
                label
            )
        })
        .collect();
    format!(
        r#"<form class="search" method="get" action="{}"><input type="search" name="search" value="{}" placeholder="Search tests" autocomplete="off"><select name="status">{}</select></form>"#,
        links.index_href(),
        escape(search),
        options
    )
}
