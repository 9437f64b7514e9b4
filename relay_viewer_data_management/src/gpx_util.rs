use std::{fs::File, io::BufReader, path::Path};

use chrono::{DateTime, Utc};
use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};
use relay_viewer_lib::track::{segment_from_path, FullTrackPoint, Track, TrackPoint};

use crate::DataManagerError;

pub const GPX_CREATOR: &str = "RelayViewer";

/// GPX segments longer than this are sampled down when loaded for display.
pub const SAMPLING_THRESHOLD: usize = 500;

/// Keep every `step`-th point so a long segment ends up with at most about 500 points.
pub fn sample_step(len: usize) -> usize {
    if len > SAMPLING_THRESHOLD {
        len / SAMPLING_THRESHOLD + 1
    } else {
        1
    }
}

fn read_gpx(path: &Path) -> Result<Gpx, DataManagerError> {
    let file = File::open(path)
        .map_err(|err| DataManagerError::Gpx(format!("Failed to open {:?}: {}", path, err)))?;
    let reader = BufReader::new(file);
    gpx::read(reader).map_err(|err| DataManagerError::Gpx(format!("Failed to parse {:?}: {}", path, err)))
}

/// Reads a relay track for display: (lat, lon) only, long segments sampled.
pub fn read_track(path: &Path) -> Result<Track, DataManagerError> {
    let segment = segment_from_path(path)
        .ok_or_else(|| DataManagerError::Gpx(format!("No segment number in {:?}", path)))?;
    let gpx = read_gpx(path)?;

    let mut points = Vec::new();
    for track in gpx.tracks {
        for track_segment in track.segments {
            let step = sample_step(track_segment.points.len());
            points.extend(
                track_segment
                    .points
                    .iter()
                    .step_by(step)
                    .map(|waypoint| TrackPoint::from(waypoint.point())),
            );
        }
    }

    Ok(Track::new(segment, points, path.to_path_buf()))
}

/// Every point of the file with elevation and time, nothing sampled.
pub fn read_full_track(path: &Path) -> Result<Vec<FullTrackPoint>, DataManagerError> {
    let gpx = read_gpx(path)?;

    let mut points = Vec::new();
    for track in gpx.tracks {
        for track_segment in track.segments {
            for waypoint in track_segment.points {
                let position = waypoint.point();
                points.push(FullTrackPoint {
                    latitude: position.y(),
                    longitude: position.x(),
                    elevation: waypoint.elevation,
                    timestamp: waypoint.time.and_then(to_utc),
                });
            }
        }
    }

    Ok(points)
}

fn to_utc(time: gpx::Time) -> Option<DateTime<Utc>> {
    let formatted = time.format().ok()?;
    DateTime::parse_from_rfc3339(&formatted)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// A GPX 1.1 document holding the track as a single segment, empty for an empty track.
pub fn export_gpx(track: &Track) -> Result<String, DataManagerError> {
    if track.points.is_empty() {
        return Ok(String::new());
    }

    let mut gpx = Gpx::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(GPX_CREATOR.into());

    let mut segment = TrackSegment::new();
    segment
        .points
        .extend(track.points.iter().map(|p| Waypoint::new(p.to_point())));

    let mut gpx_track = gpx::Track::new();
    gpx_track.name = Some(format!("Segment_{}", track.segment));
    gpx_track.segments.push(segment);
    gpx.tracks.push(gpx_track);

    let mut buf = Vec::new();
    gpx::write(&gpx, &mut buf)
        .map_err(|err| DataManagerError::Export(format!("Failed to write GPX: {}", err)))?;

    String::from_utf8(buf).map_err(|err| DataManagerError::Export(format!("GPX output is not UTF-8: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{gpx_document, line, write_track};

    #[test]
    fn sampling_steps() {
        assert_eq!(sample_step(10), 1);
        assert_eq!(sample_step(500), 1);
        assert_eq!(sample_step(501), 2);
        assert_eq!(sample_step(1200), 3);
    }

    #[test]
    fn reads_small_track_unsampled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_track(dir.path(), 4, line(12));

        let track = read_track(&path).unwrap();
        assert_eq!(track.segment, 4);
        assert_eq!(track.points.len(), 12);
        assert_eq!(track.points[0], TrackPoint::new(48.8566, 2.3522));
        assert_eq!(track.file, path);
    }

    #[test]
    fn samples_each_long_segment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relai_1.gpx");
        std::fs::write(&path, gpx_document(&[line(1200), line(20)])).unwrap();

        let track = read_track(&path).unwrap();
        // 1200 points with step 3 -> 400, the short segment is kept whole
        assert_eq!(track.points.len(), 400 + 20);

        let full = read_full_track(&path).unwrap();
        assert_eq!(full.len(), 1220);
        assert_eq!(full[0].elevation, Some(35.));
        assert_eq!(
            full[1].timestamp.unwrap().to_rfc3339(),
            "2024-05-01T08:00:01+00:00"
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relai_2.gpx");
        std::fs::write(&path, "<gpx><trk>").unwrap();
        assert!(matches!(read_track(&path), Err(DataManagerError::Gpx(_))));
    }

    #[test]
    fn exported_gpx_reads_back() {
        let track = Track::new(
            7,
            vec![TrackPoint::new(48.85, 2.35), TrackPoint::new(48.86, 2.36)],
            "relai_7.gpx".into(),
        );
        let xml = export_gpx(&track).unwrap();
        assert!(xml.contains("Segment_7"));

        let gpx = gpx::read(xml.as_bytes()).unwrap();
        let points: Vec<TrackPoint> = gpx.tracks[0].segments[0]
            .points
            .iter()
            .map(|w| TrackPoint::from(w.point()))
            .collect();
        assert_eq!(points, track.points);
    }

    #[test]
    fn empty_track_exports_nothing() {
        let track = Track::new(1, Vec::new(), "relai_1.gpx".into());
        assert_eq!(export_gpx(&track).unwrap(), "");
    }
}
