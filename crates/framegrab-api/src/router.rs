use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.max_video_size_bytes as usize;

    Router::new()
        .route("/upload/video", post(handlers::upload::upload_video))
        .route(
            "/upload/brand-image",
            post(handlers::upload::upload_brand_image),
        )
        .route(
            "/upload/analysis/{*video_file_name}",
            get(handlers::upload::get_analysis),
        )
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
