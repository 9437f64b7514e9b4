use std::fmt;

use const_format::concatcp;

pub mod cache;
pub mod discovery;
pub mod export;
pub mod gpx_util;
mod data_manager;

#[cfg(test)]
pub(crate) mod test_util;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const CACHE_DIR: &str = concatcp!(DATA_DIR, "cache");

#[derive(Debug)]
pub enum DataManagerError {
    /// The relay directory does not exist or is not a relay directory.
    MissingDirectory(String),
    /// The directory holds no readable track file.
    NoTracks(String),
    UnknownSegment(u32),
    Gpx(String),
    Cache(String),
    Export(String),
    Io(String),
}

impl fmt::Display for DataManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataManagerError::MissingDirectory(dir) => write!(f, "Directory {dir} does not exist"),
            DataManagerError::NoTracks(dir) => write!(f, "No GPX track found in {dir}"),
            DataManagerError::UnknownSegment(segment) => write!(f, "Segment {segment} not found"),
            DataManagerError::Gpx(msg)
            | DataManagerError::Cache(msg)
            | DataManagerError::Export(msg)
            | DataManagerError::Io(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for DataManagerError {}
