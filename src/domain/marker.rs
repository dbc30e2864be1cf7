use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use super::sample::{Price, Sample, VirtualTimeMs};

/// Direction of a chart annotation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    #[strum(serialize = "LONG")]
    Long,
    #[strum(serialize = "SHORT")]
    Short,
}

impl MarkerKind {
    pub fn opposite(self) -> Self {
        match self {
            MarkerKind::Long => MarkerKind::Short,
            MarkerKind::Short => MarkerKind::Long,
        }
    }

    /// Glyph used by the side panel listing.
    pub fn arrow(self) -> &'static str {
        match self {
            MarkerKind::Long => "▲",
            MarkerKind::Short => "▼",
        }
    }
}

/// A directional annotation pinned to the sample that was current when it fired.
/// Holds copies, never a reference into the series buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub timestamp: VirtualTimeMs,
    pub value: Price,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn capture(sample: &Sample, kind: MarkerKind) -> Self {
        Marker {
            timestamp: sample.timestamp,
            value: sample.value,
            kind,
        }
    }
}

/// One pre-authored entry of an external playback timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Offset into the external media, in seconds
    #[serde(rename = "start")]
    pub start_secs: f64,
    pub kind: MarkerKind,
}

impl TimelineEntry {
    pub const fn new(start_secs: f64, kind: MarkerKind) -> Self {
        TimelineEntry { start_secs, kind }
    }

    /// Is `position_secs` inside `[start, start + window)`?
    pub fn is_active_at(&self, position_secs: f64, window_secs: f64) -> bool {
        position_secs >= self.start_secs && position_secs < self.start_secs + window_secs
    }
}

/// Timeline bundled with the default configuration. Alternates direction so
/// every entry produces its own marker.
pub fn default_timeline() -> Vec<TimelineEntry> {
    use MarkerKind::{Long, Short};
    vec![
        TimelineEntry::new(0.132, Short),
        TimelineEntry::new(0.528, Long),
        TimelineEntry::new(1.716, Short),
        TimelineEntry::new(2.904, Long),
        TimelineEntry::new(4.092, Short),
        TimelineEntry::new(5.280, Long),
        TimelineEntry::new(6.468, Short),
        TimelineEntry::new(7.656, Long),
        TimelineEntry::new(8.844, Short),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_copies_sample_by_value() {
        let mut sample = Sample::new(1_000.0, 100.02);
        let marker = Marker::capture(&sample, MarkerKind::Long);
        sample.value = 0.0;

        assert_eq!(marker.value, 100.02);
        assert_eq!(marker.timestamp, 1_000.0);
    }

    #[test]
    fn active_window_is_half_open() {
        let entry = TimelineEntry::new(1.0, MarkerKind::Short);
        assert!(!entry.is_active_at(0.999, 0.8));
        assert!(entry.is_active_at(1.0, 0.8));
        assert!(entry.is_active_at(1.79, 0.8));
        assert!(!entry.is_active_at(1.8, 0.8));
    }

    #[test]
    fn timeline_parses_from_json() {
        let json = r#"[{"start":0.132,"kind":"short"},{"start":0.528,"kind":"long"}]"#;
        let entries: Vec<TimelineEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries, default_timeline()[..2].to_vec());
    }
}
