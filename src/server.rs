use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(crate::routes::pages::index))
        .route("/tests/{id}", get(crate::routes::pages::test_page))
        // Static resources
        .route("/assets/{file}", get(crate::routes::assets::asset))
        .route(
            "/qase-report-jsonp/attachments/{file}",
            get(crate::routes::attachments::attachment),
        )
        // JSON API
        .route("/api/report", get(crate::routes::api::report))
        .route("/api/tests", get(crate::routes::api::tests))
        .route("/api/tests/{id}", get(crate::routes::api::test_detail))
        .route("/api/select/{id}", post(crate::routes::api::select))
        .route("/api/reload", post(crate::routes::api::reload))
        .route("/api/events", get(crate::routes::events::events))
        // Health
        .route("/health", get(crate::routes::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
