use relay_viewer_lib::{
    settings::{MapStyle, DEFAULT_CENTER},
    track::{Track, TrackPoint},
};
use serde::Serialize;

use super::{placeholder_html, script_json};

const RELAY_TEMPLATE: &str = include_str!("../../templates/relay_animation.html");
const SEGMENT_TEMPLATE: &str = include_str!("../../templates/segment_animation.html");
const STYLE: &str = include_str!("../../templates/animation_style.css");

/// Segments with more points than this animate slowly in most browsers.
pub const LARGE_SEGMENT_POINTS: usize = 500;

#[derive(Serialize)]
struct Trace {
    segment: u32,
    points: Vec<(f64, f64)>,
}

#[derive(Serialize)]
struct RelayConfig<'a> {
    tile_url: &'a str,
    attribution: &'a str,
    center: (f64, f64),
    speed: u32,
    traces: Vec<Trace>,
}

#[derive(Serialize)]
struct SegmentConfig<'a> {
    tile_url: &'a str,
    attribution: &'a str,
    center: (f64, f64),
    speed: u32,
    segment: u32,
    points: Vec<(f64, f64)>,
}

fn lat_lons(points: &[TrackPoint]) -> Vec<(f64, f64)> {
    points.iter().map(TrackPoint::lat_lon).collect()
}

fn fill(template: &str, config: &impl Serialize) -> String {
    template
        .replace("{{STYLE}}", STYLE)
        .replace("{{CONFIG}}", &script_json(config))
}

/// Animates the first `max_segments` tracks one after the other, a new colour per relay leg.
pub fn relay_animation_html(tracks: &[&Track], max_segments: usize, speed_ms: u32, style: MapStyle) -> String {
    let traces: Vec<Trace> = tracks
        .iter()
        .take(max_segments)
        .filter(|track| !track.points.is_empty())
        .map(|track| Trace {
            segment: track.segment,
            points: lat_lons(&track.points),
        })
        .collect();

    if traces.is_empty() {
        return placeholder_html("No track available for the animation");
    }

    let config = RelayConfig {
        tile_url: style.tile_url(),
        attribution: style.attribution(),
        center: traces[0].points[0],
        speed: speed_ms,
        traces,
    };

    fill(RELAY_TEMPLATE, &config)
}

/// Animates a single segment point by point.
pub fn segment_animation_html(track: &Track, speed_ms: u32, style: MapStyle) -> String {
    if !track.is_drawable() {
        return placeholder_html("Not enough points to animate this segment");
    }

    let config = SegmentConfig {
        tile_url: style.tile_url(),
        attribution: style.attribution(),
        center: track.center().unwrap_or(DEFAULT_CENTER),
        speed: speed_ms,
        segment: track.segment,
        points: lat_lons(&track.points),
    };

    fill(SEGMENT_TEMPLATE, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(segment: u32, n: usize) -> Track {
        let points = (0..n).map(|i| TrackPoint::new(48. + i as f64, 2.)).collect();
        Track::new(segment, points, format!("relai_{segment}.gpx").into())
    }

    fn config_of(html: &str) -> serde_json::Value {
        let start = html.find("var config = ").unwrap() + "var config = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn relay_animation_keeps_segment_order_and_limit() {
        let tracks = [track(1, 3), track(2, 0), track(3, 2), track(4, 2)];
        let refs: Vec<&Track> = tracks.iter().collect();
        let html = relay_animation_html(&refs, 3, 120, MapStyle::OpenStreetMap);
        let config = config_of(&html);

        let segments: Vec<u64> = config["traces"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["segment"].as_u64().unwrap())
            .collect();
        assert_eq!(segments, vec![1, 3]);
        assert_eq!(config["speed"], 120);
        assert_eq!(config["center"], serde_json::json!([48., 2.]));
        assert!(html.contains("#progress-bar"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn relay_animation_without_points_is_a_placeholder() {
        let empty = track(1, 0);
        let html = relay_animation_html(&[&empty], 10, 100, MapStyle::default());
        assert!(html.contains("No track available"));
        assert!(relay_animation_html(&[], 10, 100, MapStyle::default()).contains("No track available"));
    }

    #[test]
    fn segment_animation_needs_two_points() {
        let html = segment_animation_html(&track(5, 1), 100, MapStyle::default());
        assert!(html.contains("Not enough points"));

        let html = segment_animation_html(&track(5, 4), 40, MapStyle::default());
        let config = config_of(&html);
        assert_eq!(config["segment"], 5);
        assert_eq!(config["points"].as_array().unwrap().len(), 4);
        assert_eq!(config["speed"], 40);
    }
}
