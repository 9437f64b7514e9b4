use relay_viewer_lib::{stats::segment_stats, track::{Track, TrackPoint}};
use serde::Serialize;

use crate::DataManagerError;

pub const GOOGLE_MAPS_URL: &str = "https://www.google.com/maps";
const GOOGLE_MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/";
/// Forces walking directions.
const GOOGLE_MAPS_WALKING: &str = "data=!4m2!4m1!3e2";
const MAX_URL_LEN: usize = 2000;
const MAX_ROUTE_POINTS: usize = 10;

#[derive(Serialize)]
struct StatsRow {
    #[serde(rename = "Segment")]
    segment: u32,
    #[serde(rename = "Points")]
    points: usize,
    #[serde(rename = "Distance (km)")]
    distance_km: f64,
}

/// One CSV row per track: segment, point count and distance.
pub fn stats_csv(tracks: &[Track]) -> Result<String, DataManagerError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for track in tracks {
        let stats = segment_stats(track);
        writer
            .serialize(StatsRow {
                segment: stats.segment,
                points: stats.points,
                distance_km: stats.distance_km,
            })
            .map_err(|err| DataManagerError::Export(format!("Failed to write CSV row: {}", err)))?;
    }

    if tracks.is_empty() {
        writer
            .write_record(["Segment", "Points", "Distance (km)"])
            .map_err(|err| DataManagerError::Export(format!("Failed to write CSV header: {}", err)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| DataManagerError::Export(format!("Failed to flush CSV: {}", err)))?;
    String::from_utf8(bytes).map_err(|err| DataManagerError::Export(format!("CSV is not UTF-8: {}", err)))
}

/// Degrees, minutes, seconds with a hemisphere letter, e.g. `48°51'23.8"N`.
pub fn decimal_to_dms(coord: f64, is_lat: bool) -> String {
    let abs = coord.abs();
    let degrees = abs.trunc();
    let minutes_float = (abs - degrees) * 60.;
    let minutes = minutes_float.trunc();
    let seconds = (minutes_float - minutes) * 60.;

    let direction = match (is_lat, coord >= 0.) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'W',
    };

    format!("{}°{}'{:.1}\"{}", degrees as u32, minutes as u32, seconds, direction)
}

/// Percent-encodes everything except unreserved characters and `/`.
fn url_quote(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' | b'/' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// First, last and up to 8 evenly spaced points in between.
fn route_points(points: &[TrackPoint]) -> Vec<&TrackPoint> {
    if points.len() <= MAX_ROUTE_POINTS {
        return points.iter().collect();
    }

    let last = points.len() - 1;
    let step = last / 8;

    let mut route = vec![&points[0]];
    route.extend((step..last).step_by(step).take(8).map(|i| &points[i]));
    route.push(&points[last]);
    route
}

fn coords(point: &TrackPoint) -> String {
    format!("{:.6},{:.6}", point.latitude, point.longitude)
}

/// Google Maps directions through a sample of the track, walking mode.
pub fn google_maps_link(points: &[TrackPoint]) -> String {
    directions_link(points, MAX_URL_LEN)
}

/// Falls back to the first and last point when the URL is longer than `max_len`.
fn directions_link(points: &[TrackPoint], max_len: usize) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return GOOGLE_MAPS_URL.to_string();
    };
    if points.len() < 2 {
        return GOOGLE_MAPS_URL.to_string();
    }

    let path = route_points(points)
        .into_iter()
        .map(coords)
        .collect::<Vec<_>>()
        .join("/");

    let start = format!("{} {}", decimal_to_dms(first.latitude, true), decimal_to_dms(first.longitude, false));
    let end = format!("{} {}", decimal_to_dms(last.latitude, true), decimal_to_dms(last.longitude, false));
    let query = format!("start={}&end={}&{}", url_quote(&start), url_quote(&end), GOOGLE_MAPS_WALKING);

    let url = format!("{}{}?{}", GOOGLE_MAPS_DIR_URL, path, query);
    if url.len() > max_len {
        return format!("{}{}/{}?{}", GOOGLE_MAPS_DIR_URL, coords(first), coords(last), query);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(f64, f64)]) -> Vec<TrackPoint> {
        raw.iter().map(|&(lat, lon)| TrackPoint::new(lat, lon)).collect()
    }

    #[test]
    fn dms_in_every_hemisphere() {
        assert_eq!(decimal_to_dms(48.8566, true), "48°51'23.8\"N");
        assert_eq!(decimal_to_dms(2.3522, false), "2°21'7.9\"E");
        assert_eq!(decimal_to_dms(-33.8688, true), "33°52'7.7\"S");
        assert_eq!(decimal_to_dms(-58.3816, false), "58°22'53.8\"W");
    }

    #[test]
    fn short_routes_use_every_point() {
        let url = google_maps_link(&points(&[(48.8566, 2.3522), (48.86, 2.36), (48.87, 2.37)]));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/48.856600,2.352200/48.860000,2.360000/48.870000,2.370000\
             ?start=48%C2%B051%2723.8%22N%202%C2%B021%277.9%22E\
             &end=48%C2%B052%2712.0%22N%202%C2%B022%2712.0%22E&data=!4m2!4m1!3e2"
        );
    }

    #[test]
    fn long_routes_are_sampled() {
        let pts: Vec<TrackPoint> = (0..25).map(|i| TrackPoint::new(48. + i as f64 * 0.001, 2.)).collect();
        let url = google_maps_link(&pts);
        let path = url
            .trim_start_matches(GOOGLE_MAPS_DIR_URL)
            .split('?')
            .next()
            .unwrap();
        let stops: Vec<&str> = path.split('/').collect();

        assert_eq!(stops.len(), 9);
        assert_eq!(stops[0], "48.000000,2.000000");
        assert_eq!(stops[1], "48.003000,2.000000");
        assert_eq!(stops[8], "48.024000,2.000000");
    }

    #[test]
    fn overlong_urls_keep_only_the_ends() {
        let pts = points(&[(48.8566, 2.3522), (48.86, 2.36), (48.87, 2.37)]);
        let url = directions_link(&pts, 100);
        assert!(url.starts_with("https://www.google.com/maps/dir/48.856600,2.352200/48.870000,2.370000?start="));
        assert!(!url.contains("48.860000,2.360000"));
        assert!(url.ends_with("&data=!4m2!4m1!3e2"));

        assert_eq!(directions_link(&pts, MAX_URL_LEN), google_maps_link(&pts));
        assert!(google_maps_link(&pts).contains("48.860000,2.360000"));
    }

    #[test]
    fn too_few_points_link_to_the_map() {
        assert_eq!(google_maps_link(&[]), GOOGLE_MAPS_URL);
        assert_eq!(google_maps_link(&points(&[(1., 1.)])), GOOGLE_MAPS_URL);
    }

    #[test]
    fn csv_has_a_row_per_track() {
        let tracks = vec![
            Track::new(1, points(&[(0., 0.), (1., 0.)]), "relai_1.gpx".into()),
            Track::new(2, points(&[(0., 0.)]), "relai_2.gpx".into()),
        ];
        let csv = stats_csv(&tracks).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Segment,Points,Distance (km)");
        assert!(lines[1].starts_with("1,2,111.19"));
        assert_eq!(lines[2], "2,1,0.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_csv_still_has_a_header() {
        assert_eq!(stats_csv(&[]).unwrap(), "Segment,Points,Distance (km)\n");
    }

    #[test]
    fn quoting_matches_url_rules() {
        assert_eq!(url_quote("a b/c'\""), "a%20b/c%27%22");
        assert_eq!(url_quote("°"), "%C2%B0");
    }
}
