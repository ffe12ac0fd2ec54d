//! JSON view of the viewer state.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::detail::DetailState;
use crate::error::ReportError;
use crate::model::TestPreview;
use crate::routes::pages::PageQuery;
use crate::selection::Selection;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct TestListResponse {
    pub tests: Vec<TestPreview>,
    pub total: usize,
    pub matched: usize,
    pub search: String,
    pub selection: Selection,
}

/// GET /api/report — the loaded report, previews included.
pub async fn report(State(state): State<SharedState>) -> Response {
    state.ensure_loaded().await;
    let previews = state.previews.read().await;
    match (previews.report(), previews.last_error()) {
        (Some(report), _) => Json(report).into_response(),
        (None, Some(error)) => {
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": error }))).into_response()
        }
        (None, None) => ReportError::NotFound("report".to_string()).into_response(),
    }
}

/// GET /api/tests?search=&status= — filtered previews.
pub async fn tests(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Json<TestListResponse> {
    state.ensure_loaded().await;
    let previews = state.previews.read().await;
    let tests: Vec<TestPreview> = previews
        .filter(query.search(), query.status())
        .into_iter()
        .cloned()
        .collect();
    let selection = state.selection.read().await.current().clone();

    Json(TestListResponse {
        matched: tests.len(),
        total: previews.previews().len(),
        tests,
        search: query.search().to_string(),
        selection,
    })
}

/// GET /api/tests/{id} — settled detail of one test; the selection is untouched.
pub async fn test_detail(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DetailState>, ReportError> {
    state.ensure_loaded().await;
    Ok(Json(state.detail_for(&id).await?))
}

/// POST /api/select/{id} — explicit pick without waiting for the detail.
pub async fn select(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ReportError> {
    state.ensure_loaded().await;
    state.select(&id).await?;
    let detail = state.detail.current();
    Ok(Json(json!({
        "selected": id,
        "generation": detail.generation,
    })))
}

/// POST /api/reload — refetch the preview collection.
pub async fn reload(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ReportError> {
    let count = state.load().await?;
    Ok(Json(json!({ "loaded": count })))
}
