use serde::{Deserialize, Serialize};

use crate::track::Track;

pub const DEFAULT_MAX_DISPLAY: usize = 50;
pub const DEFAULT_RANGE_END: usize = 20;
pub const DEFAULT_SPECIFIC_COUNT: usize = 30;

/// How the user picks which segments are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SegmentSelection {
    /// The first `max_display` segments.
    All { max_display: Option<usize> },
    /// Inclusive index range into the sorted list of available segments.
    Range { from: Option<usize>, to: Option<usize> },
    /// An explicit list of segment numbers.
    Specific { segments: Option<Vec<u32>> },
}

impl Default for SegmentSelection {
    fn default() -> Self {
        Self::All { max_display: None }
    }
}

impl SegmentSelection {
    /// Resolves the selection against the available segments, which must be sorted.
    pub fn apply(&self, available: &[u32]) -> Vec<u32> {
        let n = available.len();
        if n == 0 {
            return Vec::new();
        }

        match self {
            Self::All { max_display } => {
                let max = max_display.unwrap_or(DEFAULT_MAX_DISPLAY).clamp(1, n);
                available[..max].to_vec()
            }
            Self::Range { from, to } => {
                if n < 2 {
                    return available.to_vec();
                }
                let from = from.unwrap_or(0).min(n - 1);
                let to = to.unwrap_or(DEFAULT_RANGE_END.min(n - 1)).min(n - 1);
                let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
                available[lo..=hi].to_vec()
            }
            Self::Specific { segments: None } => {
                available[..DEFAULT_SPECIFIC_COUNT.min(n)].to_vec()
            }
            Self::Specific { segments: Some(wanted) } => available
                .iter()
                .copied()
                .filter(|segment| wanted.contains(segment))
                .collect(),
        }
    }
}

pub fn available_segments(tracks: &[Track]) -> Vec<u32> {
    tracks.iter().map(|track| track.segment).collect()
}

/// Tracks whose segment is selected. An empty selection selects everything.
pub fn selected_tracks<'a>(tracks: &'a [Track], selected: &[u32]) -> Vec<&'a Track> {
    tracks
        .iter()
        .filter(|track| selected.is_empty() || selected.contains(&track.segment))
        .collect()
}
