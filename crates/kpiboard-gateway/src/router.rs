//! Axum router wiring.
//!
//! Public: `/`, `/api/metrics`, `/api/files/:category`, `/uploads/*`.
//! Admin (Basic auth): `/admin/check`, `/admin/upload/:category`,
//! `/admin/delete/:category/:filename`, `/admin/metrics`.
//! Ops: `/healthz`, `/readyz`, `/metrics`.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{app_state::AppState, auth, handlers, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let max_upload = state.cfg().storage.max_upload_bytes;
    let index_file = state.cfg().server.index_file.clone();
    let uploads_root = state.cfg().storage.uploads_root.clone();

    let admin = Router::new()
        .route("/check", get(handlers::admin::check))
        .route(
            "/upload/:category",
            post(handlers::files::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/delete/:category/:filename", delete(handlers::files::delete))
        .route("/metrics", post(handlers::metrics::save))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .route_service("/", ServeFile::new(index_file))
        .route("/api/metrics", get(handlers::metrics::get))
        .route("/api/files/:category", get(handlers::files::list))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .nest("/admin", admin)
        .nest_service("/uploads", ServeDir::new(uploads_root))
        .layer(middleware::from_fn_with_state(state.clone(), obs::track))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
