use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use relay_viewer_lib::selection::{available_segments, selected_tracks};

use crate::{
    error::page_error,
    query::SelectionQuery,
    render::{overview_map_html, placeholder_html, relay_animation_html, segment_animation_html, segment_map_html},
    server_state::ServerState,
};

pub const EMPTY_SELECTION_MESSAGE: &str = "Select at least one segment to start the animation";

/// Overview map of the selected segments.
pub async fn map_page(
    State(state): State<Arc<ServerState>>,
    Path(directory): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let tracks = match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => tracks,
        Err(err) => return page_error(err),
    };

    let settings = state.data_manager.settings().await;
    let selected = query.selection().apply(&available_segments(&tracks));
    Html(overview_map_html(&tracks, &selected, &settings)).into_response()
}

/// Relay animation, segments played one after the other.
pub async fn relay_animation_page(
    State(state): State<Arc<ServerState>>,
    Path(directory): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let tracks = match state.data_manager.load_tracks(&directory).await {
        Ok(tracks) => tracks,
        Err(err) => return page_error(err),
    };

    let selected = query.selection().apply(&available_segments(&tracks));
    if selected.is_empty() {
        return Html(placeholder_html(EMPTY_SELECTION_MESSAGE)).into_response();
    }

    let settings = state.data_manager.settings().await;
    let speed = query.speed.unwrap_or(settings.animation_speed_ms).clamp(50, 500);
    let shown = selected_tracks(&tracks, &selected);
    Html(relay_animation_html(&shown, shown.len(), speed, settings.map_style)).into_response()
}

pub async fn segment_map_page(
    State(state): State<Arc<ServerState>>,
    Path((directory, segment)): Path<(String, u32)>,
) -> Response {
    match state.data_manager.get_track(&directory, segment).await {
        Ok(track) => {
            let settings = state.data_manager.settings().await;
            Html(segment_map_html(&track, &settings)).into_response()
        }
        Err(err) => page_error(err),
    }
}

pub async fn segment_animation_page(
    State(state): State<Arc<ServerState>>,
    Path((directory, segment)): Path<(String, u32)>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let track = match state.data_manager.get_track(&directory, segment).await {
        Ok(track) => track,
        Err(err) => return page_error(err),
    };

    let settings = state.data_manager.settings().await;
    let speed = query.speed.unwrap_or(settings.segment_animation_speed_ms).clamp(10, 500);
    Html(segment_animation_html(&track, speed, settings.map_style)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode};
    use relay_viewer_data_management::DataManager;

    use super::*;

    async fn state_with_relay(segments: &[u32]) -> (tempfile::TempDir, Arc<ServerState>) {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("Relais_test");
        std::fs::create_dir_all(&dir).unwrap();
        for &segment in segments {
            let points: String = (0..3)
                .map(|i| format!("<trkpt lat=\"{}\" lon=\"{}\"></trkpt>", 48.85 + i as f64 * 0.002, 2.35 + segment as f64 * 0.01))
                .collect();
            let gpx = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1"><trk><trkseg>{}</trkseg></trk></gpx>"#,
                points
            );
            std::fs::write(dir.join(format!("relai_{}.gpx", segment)), gpx).unwrap();
        }

        let data_manager = DataManager::with_paths(base.path(), base.path().join("cache")).await.unwrap();
        let state = Arc::new(ServerState {
            data_manager,
            ip_address: None,
        });
        (base, state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn map_page_embeds_the_tracks() {
        let (_base, state) = state_with_relay(&[1, 2]).await;
        let response = map_page(State(state), Path("Relais_test".into()), Query(SelectionQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("leaflet"));
        assert!(html.contains("\"segment\":2"));
    }

    #[tokio::test]
    async fn empty_selection_shows_a_notice() {
        let (_base, state) = state_with_relay(&[1, 2]).await;
        let query = SelectionQuery {
            mode: Some("specific".into()),
            segments: Some(String::new()),
            ..Default::default()
        };
        let html = body_text(relay_animation_page(State(state), Path("Relais_test".into()), Query(query)).await).await;
        assert!(html.contains(EMPTY_SELECTION_MESSAGE));
    }

    #[tokio::test]
    async fn relay_animation_clamps_the_speed() {
        let (_base, state) = state_with_relay(&[1, 2, 3]).await;
        let query = SelectionQuery {
            speed: Some(5),
            ..Default::default()
        };
        let html = body_text(relay_animation_page(State(state), Path("Relais_test".into()), Query(query)).await).await;
        assert!(html.contains("\"speed\":50"));
    }

    #[tokio::test]
    async fn unknown_segment_is_a_not_found_page() {
        let (_base, state) = state_with_relay(&[1]).await;
        let response = segment_map_page(State(state.clone()), Path(("Relais_test".into(), 4))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = segment_animation_page(State(state), Path(("Relais_test".into(), 1)), Query(SelectionQuery::default())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
