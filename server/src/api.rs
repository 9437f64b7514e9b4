use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use relay_viewer_data_management::{
    export::{google_maps_link, stats_csv},
    gpx_util::export_gpx,
};
use relay_viewer_lib::{
    feature_collection::tracks_to_feature_collection,
    selection::available_segments,
    settings::{MapStyle, Settings},
    stats::{global_stats, segment_stats, stats_table, GlobalStats, SegmentStats},
    track::TrackPoint,
};
use serde::Serialize;

use crate::{error::api_error, query::SelectionQuery, render::LARGE_SEGMENT_POINTS, server_state::ServerState};

pub const STATS_CSV_FILE_NAME: &str = "relay_stats.csv";

#[derive(Serialize)]
pub struct TrackSummary {
    pub segment: u32,
    pub points: usize,
    pub distance_km: f64,
    pub file: String,
}

#[derive(Serialize)]
pub struct SelectionSummary {
    pub available: Vec<u32>,
    pub selected: Vec<u32>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub global: GlobalStats,
    /// Every loaded segment, for the distance chart.
    pub segments: Vec<SegmentStats>,
    /// Selected segments with at least two points, distances rounded.
    pub selected: Vec<SegmentStats>,
}

#[derive(Serialize)]
pub struct SegmentDetail {
    pub segment: u32,
    pub points: usize,
    pub distance_km: f64,
    pub start: Option<TrackPoint>,
    pub end: Option<TrackPoint>,
    pub google_maps_url: String,
    pub large: bool,
}

#[derive(Serialize)]
pub struct MapStyleEntry {
    pub id: MapStyle,
    pub label: &'static str,
}

fn attachment(content_type: &'static str, file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        body,
    )
        .into_response()
}

pub async fn get_directories(State(state): State<Arc<ServerState>>) -> Response {
    match state.data_manager.directories() {
        Ok(dirs) => Json(dirs).into_response(),
        Err(err) => api_error(err),
    }
}

pub async fn get_tracks(State(state): State<Arc<ServerState>>, Path(directory): Path<String>) -> Response {
    let tracks = match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => tracks,
        Err(err) => return api_error(err),
    };

    let summaries: Vec<TrackSummary> = tracks
        .iter()
        .map(|track| TrackSummary {
            segment: track.segment,
            points: track.points.len(),
            distance_km: track.distance_km(),
            file: track
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
        .collect();

    Json(summaries).into_response()
}

pub async fn get_selection(
    State(state): State<Arc<ServerState>>,
    Path(directory): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => {
            let available = available_segments(&tracks);
            let selected = query.selection().apply(&available);
            Json(SelectionSummary { available, selected }).into_response()
        }
        Err(err) => api_error(err),
    }
}

pub async fn get_stats(
    State(state): State<Arc<ServerState>>,
    Path(directory): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let tracks = match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => tracks,
        Err(err) => return api_error(err),
    };

    let selected = query.selection().apply(&available_segments(&tracks));
    Json(StatsResponse {
        global: global_stats(&tracks),
        segments: tracks.iter().map(segment_stats).collect(),
        selected: stats_table(&tracks, &selected),
    })
    .into_response()
}

pub async fn get_geojson(
    State(state): State<Arc<ServerState>>,
    Path(directory): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => {
            let selected = query.selection().apply(&available_segments(&tracks));
            Json(tracks_to_feature_collection(&tracks, &selected, 1)).into_response()
        }
        Err(err) => api_error(err),
    }
}

pub async fn get_stats_csv(State(state): State<Arc<ServerState>>, Path(directory): Path<String>) -> Response {
    let tracks = match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => tracks,
        Err(err) => return api_error(err),
    };

    match stats_csv(&tracks) {
        Ok(csv) => attachment("text/csv", STATS_CSV_FILE_NAME, csv),
        Err(err) => api_error(err),
    }
}

pub async fn get_segment(
    State(state): State<Arc<ServerState>>,
    Path((directory, segment)): Path<(String, u32)>,
) -> Response {
    let track = match state.data_manager.get_track(&directory, segment).await {
        Ok(track) => track,
        Err(err) => return api_error(err),
    };

    let stats = segment_stats(&track);
    Json(SegmentDetail {
        segment: track.segment,
        points: stats.points,
        distance_km: stats.distance_km,
        start: track.start().copied(),
        end: track.end().copied(),
        google_maps_url: google_maps_link(&track.points),
        large: stats.points > LARGE_SEGMENT_POINTS,
    })
    .into_response()
}

pub async fn get_segment_gpx(
    State(state): State<Arc<ServerState>>,
    Path((directory, segment)): Path<(String, u32)>,
) -> Response {
    let track = match state.data_manager.get_track(&directory, segment).await {
        Ok(track) => track,
        Err(err) => return api_error(err),
    };

    match export_gpx(&track) {
        Ok(gpx) if gpx.is_empty() => (StatusCode::NO_CONTENT, ()).into_response(),
        Ok(gpx) => attachment("application/gpx+xml", &format!("segment_{}.gpx", segment), gpx),
        Err(err) => api_error(err),
    }
}

pub async fn get_full_segment(
    State(state): State<Arc<ServerState>>,
    Path((directory, segment)): Path<(String, u32)>,
) -> Response {
    match state.data_manager.get_full_track(&directory, segment).await {
        Ok(points) => Json(points).into_response(),
        Err(err) => api_error(err),
    }
}

pub async fn get_settings(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.data_manager.settings().await).into_response()
}

pub async fn post_settings(State(state): State<Arc<ServerState>>, Json(settings): Json<Settings>) -> Response {
    let stored = state.data_manager.set_settings(settings).await;
    tracing::info!("Settings updated: {:?}", stored);
    Json(stored).into_response()
}

pub async fn get_map_styles() -> Response {
    let styles: Vec<MapStyleEntry> = MapStyle::ALL
        .iter()
        .map(|style| MapStyleEntry {
            id: *style,
            label: style.label(),
        })
        .collect();
    Json(styles).into_response()
}

pub async fn post_clear_cache(State(state): State<Arc<ServerState>>) -> Response {
    match state.data_manager.clear_cache().await {
        Ok(removed) => Json(serde_json::json!({ "removed_files": removed })).into_response(),
        Err(err) => api_error(err),
    }
}

pub async fn post_reload(State(state): State<Arc<ServerState>>) -> Response {
    let dropped = state.data_manager.reload().await;
    Json(serde_json::json!({ "dropped_entries": dropped })).into_response()
}
