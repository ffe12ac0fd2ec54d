use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::selection::Selection;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: String,
    pub tests_loaded: usize,
    pub list_error: Option<String>,
    pub selection: Selection,
    pub detail_generation: u64,
}

/// Overall status: "ok" once previews loaded, "error" after a failed load,
/// "starting" before the first load finishes.
pub fn determine_status(loaded: bool, has_error: bool) -> &'static str {
    if loaded {
        "ok"
    } else if has_error {
        "error"
    } else {
        "starting"
    }
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let previews = state.previews.read().await;
    let selection = state.selection.read().await.current().clone();

    Json(HealthResponse {
        status: determine_status(previews.is_loaded(), previews.last_error().is_some()),
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.describe(),
        tests_loaded: previews.previews().len(),
        list_error: previews.last_error().map(str::to_string),
        selection,
        detail_generation: state.detail.current().generation,
    })
}
