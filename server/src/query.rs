use relay_viewer_lib::selection::SegmentSelection;
use serde::Deserialize;

/// Segment selection as sent by the dashboard,
/// `mode=all&max=..`, `mode=range&from=..&to=..` or `mode=specific&segments=1,2,3`.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub mode: Option<String>,
    pub max: Option<usize>,
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub segments: Option<String>,
    /// Animation speed in ms between two points.
    pub speed: Option<u32>,
}

impl SelectionQuery {
    pub fn selection(&self) -> SegmentSelection {
        match self.mode.as_deref() {
            Some("range") => SegmentSelection::Range {
                from: self.from,
                to: self.to,
            },
            Some("specific") => SegmentSelection::Specific {
                segments: self.segments.as_deref().map(parse_segments),
            },
            _ => SegmentSelection::All {
                max_display: self.max,
            },
        }
    }
}

fn parse_segments(list: &str) -> Vec<u32> {
    list.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_all() {
        assert_eq!(SelectionQuery::default().selection(), SegmentSelection::All { max_display: None });
    }

    #[test]
    fn parses_specific_lists() {
        let query = SelectionQuery {
            mode: Some("specific".into()),
            segments: Some("3, 1,x,,7".into()),
            ..Default::default()
        };
        assert_eq!(
            query.selection(),
            SegmentSelection::Specific { segments: Some(vec![3, 1, 7]) }
        );
    }

    #[test]
    fn parses_ranges() {
        let query = SelectionQuery {
            mode: Some("range".into()),
            from: Some(2),
            ..Default::default()
        };
        assert_eq!(query.selection(), SegmentSelection::Range { from: Some(2), to: None });
    }
}
