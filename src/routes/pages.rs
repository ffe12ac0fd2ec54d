use axum::extract::{Path, Query, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use crate::detail::DetailState;
use crate::error::ReportError;
use crate::model::TestStatus;
use crate::render::{escape, render_page, LinkStyle, PageView};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl PageQuery {
    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// Unknown status values are treated as "all statuses".
    pub fn status(&self) -> Option<TestStatus> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(TestStatus::parse)
    }
}

/// GET / — the report with the session selection. The page follows
/// selection changes made through the API.
pub async fn index(State(state): State<SharedState>, Query(query): Query<PageQuery>) -> Response {
    state.ensure_loaded().await;
    let detail = state.detail.wait_settled().await;
    let selected = state.selection.read().await.selected_id().map(str::to_string);
    render(&state, &query, selected.as_deref(), &detail.state, true).await
}

/// GET /tests/{id} — the report with the test named in the URL. Read-only:
/// the session selection stays where it is.
pub async fn test_page(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    state.ensure_loaded().await;
    match state.detail_for(&id).await {
        Ok(detail) => render(&state, &query, Some(&id), &detail, false).await,
        Err(e) => {
            debug!("No page for {}: {}", id, e);
            error_page(e)
        }
    }
}

async fn render(
    state: &SharedState,
    query: &PageQuery,
    selected_id: Option<&str>,
    detail: &DetailState,
    follows_selection: bool,
) -> Response {
    let previews = state.previews.read().await;
    let status = query.status();
    let origin = state.source.describe();

    let view = PageView {
        links: LinkStyle::Server,
        report: previews.report(),
        list_error: previews.last_error(),
        previews: previews.filter(query.search(), status),
        counts: previews.status_counts(),
        search: query.search(),
        status,
        selected_id,
        detail,
        follows_selection,
        origin: &origin,
    };
    no_cache(Html(render_page(&view)).into_response())
}

fn error_page(err: ReportError) -> Response {
    let body = format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>Error</title></head><body><p class="error">{}</p><p><a href="/">Back to report</a></p></body></html>"#,
        escape(&err.to_string())
    );
    (err.status_code(), Html(body)).into_response()
}

fn no_cache(mut resp: Response) -> Response {
    resp.headers_mut().insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    resp
}
