use geojson::{Feature, Geometry, JsonObject, Value};

pub use geojson::FeatureCollection;

use crate::{color::segment_color, selection::selected_tracks, track::Track};

/// One LineString feature per selected track with at least two points.
///
/// Coordinates are `[lon, lat]`. Every feature carries `segment`, `nb_points`
/// and the `color` it is drawn with on the overview map. `density` keeps every
/// n-th point of the line (the last point is always kept), `nb_points` still
/// reports the loaded count.
pub fn tracks_to_feature_collection(tracks: &[Track], selected: &[u32], density: usize) -> FeatureCollection {
    let shown = selected_tracks(tracks, selected);
    let n = shown.len();

    let features = shown
        .into_iter()
        .filter(|track| track.is_drawable())
        .map(|track| track_feature(track, n, density))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn track_feature(track: &Track, shown: usize, density: usize) -> Feature {
    let step = density.max(1);
    let last = track.points.len() - 1;
    let coordinates = track
        .points
        .iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0 || *i == last)
        .map(|(_, p)| vec![p.longitude, p.latitude])
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("segment".into(), track.segment.into());
    properties.insert("nb_points".into(), track.points.len().into());
    properties.insert("color".into(), segment_color(track.segment, shown).into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coordinates))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
