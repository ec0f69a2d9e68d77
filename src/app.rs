use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::content;
use crate::db::repository::ContentRepository;

/// Shared application state available to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub content_repo: Arc<dyn ContentRepository>,
}

impl AppState {
    pub fn new(content_repo: Arc<dyn ContentRepository>) -> Self {
        Self { content_repo }
    }
}

fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/content",
            get(content::list_content_handler).post(content::create_content_handler),
        )
        .route(
            "/content/",
            get(content::missing_id_handler)
                .put(content::missing_id_handler)
                .delete(content::missing_id_handler),
        )
        .route("/content/options", get(content::content_options_handler))
        .route(
            "/content/{id}",
            get(content::get_content_handler)
                .put(content::update_content_handler)
                .delete(content::delete_content_handler),
        )
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the Axum router: the content API (also mounted under `/api`) and a
/// liveness probe.
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(content_routes())
        .nest("/api", content_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(middleware)
}
