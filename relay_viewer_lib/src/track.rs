use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

use crate::distance::path_length_km;

/// Prefix every relay track file name starts with, `relai_<segment>.gpx`.
pub const TRACK_FILE_PREFIX: &str = "relai_";
pub const TRACK_FILE_EXTENSION: &str = "gpx";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Geo point, x is longitude.
    pub fn to_point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    pub fn lat_lon(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

impl From<Point> for TrackPoint {
    fn from(point: Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// A point of the unsampled variant of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullTrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// One relay segment, as read from a single track file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub segment: u32,
    pub points: Vec<TrackPoint>,
    pub file: PathBuf,
}

impl Track {
    pub fn new(segment: u32, points: Vec<TrackPoint>, file: PathBuf) -> Self {
        Self {
            segment,
            points,
            file,
        }
    }

    /// A line needs at least two points.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn distance_km(&self) -> f64 {
        if !self.is_drawable() {
            return 0.;
        }
        path_length_km(&self.points)
    }

    pub fn start(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn end(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    pub fn center(&self) -> Option<(f64, f64)> {
        mean_position(self.points.iter())
    }
}

pub(crate) fn mean_position<'a>(points: impl Iterator<Item = &'a TrackPoint>) -> Option<(f64, f64)> {
    let (count, lat, lon) = points.fold((0usize, 0., 0.), |(n, lat, lon), p| {
        (n + 1, lat + p.latitude, lon + p.longitude)
    });

    if count == 0 {
        None
    } else {
        Some((lat / count as f64, lon / count as f64))
    }
}

/// Segment number encoded in a track file name, `relai_12.gpx` -> 12.
pub fn segment_from_file_name(name: &str) -> Option<u32> {
    name.split('_').nth(1)?.split('.').next()?.parse().ok()
}

pub fn segment_from_path(path: &Path) -> Option<u32> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(segment_from_file_name)
}

/// True for `relai_*.gpx`.
pub fn is_track_file_name(name: &str) -> bool {
    name.starts_with(TRACK_FILE_PREFIX)
        && Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == TRACK_FILE_EXTENSION)
}
