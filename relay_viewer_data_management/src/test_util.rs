use std::path::{Path, PathBuf};

/// A minimal GPX 1.1 document with one track and one segment per entry of `segments`.
pub fn gpx_document(segments: &[Vec<(f64, f64)>]) -> String {
    let mut gpx = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
<trk><name>test</name>
"#,
    );
    for segment in segments {
        gpx.push_str("<trkseg>\n");
        for (i, (lat, lon)) in segment.iter().enumerate() {
            gpx.push_str(&format!(
                "<trkpt lat=\"{lat}\" lon=\"{lon}\"><ele>{}</ele><time>2024-05-01T08:{:02}:{:02}Z</time></trkpt>\n",
                35 + i % 10,
                (i / 60) % 60,
                i % 60
            ));
        }
        gpx.push_str("</trkseg>\n");
    }
    gpx.push_str("</trk>\n</gpx>\n");
    gpx
}

/// `n` points heading north from Paris, 100 m apart.
pub fn line(n: usize) -> Vec<(f64, f64)> {
    (0..n).map(|i| (48.8566 + i as f64 * 0.0009, 2.3522)).collect()
}

pub fn write_track(dir: &Path, segment: u32, points: Vec<(f64, f64)>) -> PathBuf {
    let path = dir.join(format!("relai_{segment}.gpx"));
    std::fs::write(&path, gpx_document(&[points])).unwrap();
    path
}

/// A `Relais_<name>` directory under `base` with a track per segment.
pub fn relay_dir(base: &Path, name: &str, segments: &[u32]) -> PathBuf {
    let dir = base.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for &segment in segments {
        write_track(&dir, segment, line(3 + segment as usize));
    }
    dir
}
