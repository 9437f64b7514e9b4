use relay_viewer_lib::{
    feature_collection::{tracks_to_feature_collection, FeatureCollection},
    selection::selected_tracks,
    settings::{Settings, DEFAULT_CENTER},
    track::{Track, TrackPoint},
};
use serde::Serialize;

use super::script_json;

const TEMPLATE: &str = include_str!("../../templates/map.html");

/// Start/end markers are only drawn when this few segments are shown.
pub const MAX_MARKED_SEGMENTS: usize = 30;
const OVERVIEW_ZOOM: u8 = 12;
const SEGMENT_ZOOM: u8 = 13;

#[derive(Serialize)]
struct MapConfig<'a> {
    tile_url: &'a str,
    attribution: &'a str,
    center: (f64, f64),
    zoom: u8,
    geojson: Option<FeatureCollection>,
    lines: Vec<Line>,
    markers: Vec<Marker>,
    weight: u32,
    opacity: f64,
    warning: Option<&'a str>,
}

impl<'a> MapConfig<'a> {
    fn new(settings: &Settings, center: (f64, f64), zoom: u8) -> Self {
        Self {
            tile_url: settings.map_style.tile_url(),
            attribution: settings.map_style.attribution(),
            center,
            zoom,
            geojson: None,
            lines: Vec::new(),
            markers: Vec::new(),
            weight: settings.line_thickness,
            opacity: 0.7,
            warning: None,
        }
    }

    fn render(&self) -> String {
        TEMPLATE.replace("{{CONFIG}}", &script_json(self))
    }
}

#[derive(Serialize)]
struct Line {
    points: Vec<(f64, f64)>,
    color: &'static str,
    weight: u32,
    opacity: f64,
    tooltip: String,
}

#[derive(Serialize)]
struct Marker {
    position: (f64, f64),
    color: &'static str,
    tooltip: String,
    popup: String,
}

fn start_end_markers(track: &Track, start_tooltip: String, end_tooltip: String) -> Vec<Marker> {
    let (Some(start), Some(end)) = (track.start(), track.end()) else {
        return Vec::new();
    };

    vec![
        Marker {
            position: start.lat_lon(),
            color: "green",
            tooltip: start_tooltip,
            popup: format!("Start of segment {}", track.segment),
        },
        Marker {
            position: end.lat_lon(),
            color: "red",
            tooltip: end_tooltip,
            popup: format!("End of segment {}", track.segment),
        },
    ]
}

/// Centre of the first and last points of every shown track.
fn overview_center(shown: &[&Track]) -> (f64, f64) {
    let ends: Vec<TrackPoint> = shown
        .iter()
        .flat_map(|track| track.start().into_iter().chain(track.end()))
        .copied()
        .collect();

    if ends.is_empty() {
        return DEFAULT_CENTER;
    }

    let n = ends.len() as f64;
    (
        ends.iter().map(|p| p.latitude).sum::<f64>() / n,
        ends.iter().map(|p| p.longitude).sum::<f64>() / n,
    )
}

/// Every selected track as one GeoJSON layer, with optional start/end markers.
pub fn overview_map_html(tracks: &[Track], selected: &[u32], settings: &Settings) -> String {
    let shown = selected_tracks(tracks, selected);
    let mut config = MapConfig::new(settings, overview_center(&shown), OVERVIEW_ZOOM);

    let collection = tracks_to_feature_collection(tracks, selected, settings.point_density as usize);
    if collection.features.is_empty() {
        config.warning = Some("No track to display for the selected segments.");
        return config.render();
    }
    config.geojson = Some(collection);

    if settings.show_markers && shown.len() <= MAX_MARKED_SEGMENTS {
        config.markers = shown
            .iter()
            .flat_map(|track| {
                start_end_markers(
                    track,
                    format!("Start - Segment {}", track.segment),
                    format!("End - Segment {}", track.segment),
                )
            })
            .collect();
    }

    config.render()
}

/// A single segment as a polyline, centred on the mean of its points.
pub fn segment_map_html(track: &Track, settings: &Settings) -> String {
    let Some(center) = track.center() else {
        return MapConfig::new(settings, DEFAULT_CENTER, OVERVIEW_ZOOM).render();
    };

    let mut config = MapConfig::new(settings, center, SEGMENT_ZOOM);
    config.lines.push(Line {
        points: track.points.iter().map(TrackPoint::lat_lon).collect(),
        color: "blue",
        weight: 5,
        opacity: 0.8,
        tooltip: format!("Segment {}", track.segment),
    });
    config.markers = start_end_markers(track, "Start".into(), "Finish".into());

    config.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(segment: u32, points: &[(f64, f64)]) -> Track {
        Track::new(
            segment,
            points.iter().map(|&(lat, lon)| TrackPoint::new(lat, lon)).collect(),
            format!("relai_{segment}.gpx").into(),
        )
    }

    fn config_of(html: &str) -> serde_json::Value {
        let start = html.find("var config = ").unwrap() + "var config = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn overview_centres_on_segment_ends() {
        let tracks = vec![
            track(1, &[(10., 20.), (99., 99.), (12., 22.)]),
            track(2, &[(14., 24.), (16., 26.)]),
        ];
        let config = config_of(&overview_map_html(&tracks, &[], &Settings::default()));

        assert_eq!(config["center"], serde_json::json!([13., 23.]));
        assert_eq!(config["zoom"], 12);
        assert_eq!(config["geojson"]["features"].as_array().unwrap().len(), 2);
        assert_eq!(config["markers"].as_array().unwrap().len(), 4);
        assert_eq!(config["tile_url"], Settings::default().map_style.tile_url());
    }

    #[test]
    fn markers_can_be_turned_off() {
        let tracks = vec![track(1, &[(10., 20.), (12., 22.)])];
        let settings = Settings { show_markers: false, ..Default::default() };
        let config = config_of(&overview_map_html(&tracks, &[], &settings));
        assert!(config["markers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn too_many_segments_get_no_markers() {
        let tracks: Vec<Track> = (1..=31).map(|s| track(s, &[(1., 1.), (2., 2.)])).collect();
        let config = config_of(&overview_map_html(&tracks, &[], &Settings::default()));
        assert!(config["markers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn nothing_drawable_shows_a_warning_over_paris() {
        let tracks = vec![track(1, &[])];
        let config = config_of(&overview_map_html(&tracks, &[], &Settings::default()));
        assert!(config["warning"].is_string());
        assert!(config["geojson"].is_null());
        assert_eq!(config["center"], serde_json::json!([48.8566, 2.3522]));
    }

    #[test]
    fn segment_map_draws_one_line() {
        let t = track(3, &[(10., 20.), (12., 22.)]);
        let config = config_of(&segment_map_html(&t, &Settings::default()));

        assert_eq!(config["zoom"], 13);
        assert_eq!(config["center"], serde_json::json!([11., 21.]));
        assert_eq!(config["lines"][0]["tooltip"], "Segment 3");
        assert_eq!(config["lines"][0]["points"].as_array().unwrap().len(), 2);
        assert_eq!(config["markers"][1]["tooltip"], "Finish");
    }
}
