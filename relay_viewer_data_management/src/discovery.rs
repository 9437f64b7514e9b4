use std::path::{Path, PathBuf};

use relay_viewer_lib::track::{is_track_file_name, segment_from_path};
use serde::{Deserialize, Serialize};

use crate::DataManagerError;

/// Relay directories are the sub-directories whose name starts with this.
pub const RELAY_DIR_PREFIX: &str = "Relais_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayDirectory {
    pub name: String,
    pub display_name: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// `Relais_paris_2024` -> `Relais Paris 2024`.
pub fn display_name(dir_name: &str) -> String {
    dir_name
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Rejects anything that is not a plain `Relais_*` directory name.
pub fn is_relay_dir_name(name: &str) -> bool {
    name.starts_with(RELAY_DIR_PREFIX)
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

pub fn discover_directories(base: &Path) -> Result<Vec<RelayDirectory>, DataManagerError> {
    let entries = std::fs::read_dir(base)
        .map_err(|_| DataManagerError::MissingDirectory(base.display().to_string()))?;

    let mut dirs: Vec<RelayDirectory> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            is_relay_dir_name(&name).then(|| RelayDirectory {
                display_name: display_name(&name),
                path: entry.path(),
                name,
            })
        })
        .collect();

    dirs.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    Ok(dirs)
}

/// Every `relai_*.gpx` file in `dir`, sorted by segment number.
pub fn list_track_files(dir: &Path) -> Result<Vec<PathBuf>, DataManagerError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|_| DataManagerError::MissingDirectory(dir.display().to_string()))?;

    let mut files: Vec<(u32, PathBuf)> = Vec::new();
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_track_file_name(name) {
            continue;
        }

        match segment_from_path(&path) {
            Some(segment) => files.push((segment, path)),
            None => tracing::warn!("Ignoring {:?}: no segment number in file name", path),
        }
    }

    files.sort_by_key(|(segment, _)| *segment);
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
