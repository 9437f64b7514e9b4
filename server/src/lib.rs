use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use server_state::ServerState;
use tower_http::services::{ServeDir, ServeFile};

pub mod api;
pub mod error;
pub mod pages;
pub mod query;
pub mod render;
pub mod server_state;

pub const STATIC_DIR: &str = "server/static";
pub const INDEX_FILE: &str = "server/static/index.html";

pub fn app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(INDEX_FILE))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .route("/api/directories", get(api::get_directories))
        .route("/api/map_styles", get(api::get_map_styles))
        .route("/api/settings", get(api::get_settings).post(api::post_settings))
        .route("/api/cache/clear", post(api::post_clear_cache))
        .route("/api/cache/reload", post(api::post_reload))
        .route("/api/dirs/{dir}/tracks", get(api::get_tracks))
        .route("/api/dirs/{dir}/selection", get(api::get_selection))
        .route("/api/dirs/{dir}/stats", get(api::get_stats))
        .route("/api/dirs/{dir}/stats.csv", get(api::get_stats_csv))
        .route("/api/dirs/{dir}/geojson", get(api::get_geojson))
        .route("/api/dirs/{dir}/segments/{segment}", get(api::get_segment))
        .route("/api/dirs/{dir}/segments/{segment}/gpx", get(api::get_segment_gpx))
        .route("/api/dirs/{dir}/segments/{segment}/full", get(api::get_full_segment))
        .route("/dirs/{dir}/map", get(pages::map_page))
        .route("/dirs/{dir}/animation", get(pages::relay_animation_page))
        .route("/dirs/{dir}/segments/{segment}/map", get(pages::segment_map_page))
        .route("/dirs/{dir}/segments/{segment}/animation", get(pages::segment_animation_page))
        .with_state(state.clone())
        .layer(from_fn_with_state(state, log_visit))
}

async fn log_visit(State(state): State<Arc<ServerState>>, req: Request<Body>, next: Next) -> Response {
    // Only the dashboard itself, not every map and API call it makes
    if req.uri().path() == "/" {
        if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            let same_host = addr.ip().is_loopback() || state.ip_address == Some(addr.ip());
            tracing::debug!("Visit from: {} (same host: {})", addr.ip(), same_host);
        }
    }

    next.run(req).await
}
