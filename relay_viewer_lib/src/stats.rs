use serde::{Deserialize, Serialize};

use crate::track::Track;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub segment: u32,
    pub points: usize,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_segments: usize,
    pub total_points: usize,
    pub total_distance_km: f64,
    pub average_distance_km: f64,
    pub max_distance_km: f64,
    pub min_distance_km: f64,
}

pub fn segment_stats(track: &Track) -> SegmentStats {
    SegmentStats {
        segment: track.segment,
        points: track.points.len(),
        distance_km: track.distance_km(),
    }
}

pub fn global_stats(tracks: &[Track]) -> GlobalStats {
    let distances: Vec<f64> = tracks
        .iter()
        .filter(|track| track.is_drawable())
        .map(Track::distance_km)
        .collect();

    let total_segments = tracks.len();
    let total_distance_km: f64 = distances.iter().sum();

    GlobalStats {
        total_segments,
        total_points: tracks.iter().map(|track| track.points.len()).sum(),
        total_distance_km,
        average_distance_km: if total_segments > 0 {
            total_distance_km / total_segments as f64
        } else {
            0.
        },
        max_distance_km: distances.iter().copied().reduce(f64::max).unwrap_or(0.),
        min_distance_km: distances.iter().copied().reduce(f64::min).unwrap_or(0.),
    }
}

/// Per-segment rows for the selected, drawable tracks, distances rounded to 10 m.
/// Nothing selected gives no rows.
pub fn stats_table(tracks: &[Track], selected: &[u32]) -> Vec<SegmentStats> {
    tracks
        .iter()
        .filter(|track| selected.contains(&track.segment) && track.is_drawable())
        .map(|track| {
            let mut stats = segment_stats(track);
            stats.distance_km = round2(stats.distance_km);
            stats
        })
        .collect()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.).round() / 100.
}
