mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::report::ExportOptions;
use crate::sheet::Session;

/// Shared state behind every handler.
///
/// The session mutex serializes snapshot transitions: a request holds it for
/// exactly one operation.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    export: Arc<ExportOptions>,
}

impl AppState {
    pub fn new(session: Session, export: ExportOptions) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            export: Arc::new(export),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Sheet
        .route("/sheet", get(handlers::get_sheet))
        .route("/sheet/outline", get(handlers::get_outline))
        // Categories
        .route("/categories", post(handlers::add_category))
        .route("/categories/{cat}", delete(handlers::delete_category))
        .route("/categories/{cat}/title", put(handlers::update_category_title))
        // Rows
        .route("/categories/{cat}/rows", post(handlers::add_row))
        .route("/categories/{cat}/rows/{row}", patch(handlers::update_row_field))
        .route("/categories/{cat}/rows/{row}", delete(handlers::delete_row))
        // Actors
        .route("/categories/{cat}/rows/{row}/actors", post(handlers::add_actor))
        .route(
            "/categories/{cat}/rows/{row}/actors/{actor}",
            patch(handlers::update_actor_field),
        )
        .route(
            "/categories/{cat}/rows/{row}/actors/{actor}",
            delete(handlers::delete_actor),
        )
        // Export
        .route("/export", get(handlers::export))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
