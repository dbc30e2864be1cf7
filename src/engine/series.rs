use std::collections::VecDeque;

use crate::domain::{Sample, VirtualTimeMs};

/// Time-bounded, insertion-ordered store of smoothed samples.
///
/// Samples only ever enter at the back and leave from the front, so the
/// buffer stays sorted by timestamp without any searching.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuffer {
    samples: VecDeque<Sample>,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample. A timestamp older than the current last one is pulled
    /// forward to it so the series never goes backwards.
    pub fn append(&mut self, mut sample: Sample) {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                log::debug!(
                    "SeriesBuffer: clamping out-of-order sample {:.3} -> {:.3}",
                    sample.timestamp,
                    last.timestamp
                );
                sample.timestamp = last.timestamp;
            }
        }
        self.samples.push_back(sample);
    }

    /// Drop every sample strictly older than `cutoff`. Returns how many went.
    pub fn evict_older_than(&mut self, cutoff: VirtualTimeMs) -> usize {
        let mut evicted = 0;
        while self
            .samples
            .front()
            .is_some_and(|oldest| oldest.timestamp < cutoff)
        {
            self.samples.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// The current price: always the newest sample.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Oldest-to-newest view for one render pass. The iterator is `Clone`, so a
    /// consumer may walk it more than once.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + Clone + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Oldest timestamp worth keeping: the visible history width converted to time,
/// plus a slack margin so a resize never shows a truncated left edge.
pub fn eviction_cutoff(
    now: VirtualTimeMs,
    visible_px: f64,
    pixels_per_second: f64,
    slack_ms: f64,
) -> VirtualTimeMs {
    now - (visible_px.max(0.0) / pixels_per_second) * 1000.0 - slack_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn buffer_with(timestamps: &[f64]) -> SeriesBuffer {
        let mut buffer = SeriesBuffer::new();
        for &t in timestamps {
            buffer.append(Sample::new(t, 100.0));
        }
        buffer
    }

    #[test]
    fn evicts_fifo_up_to_cutoff() {
        let mut buffer = buffer_with(&[0.0, 150.0, 300.0, 450.0, 600.0]);

        assert_eq!(buffer.evict_older_than(300.0), 2);
        assert_eq!(buffer.first().unwrap().timestamp, 300.0);
        assert_eq!(buffer.last().unwrap().timestamp, 600.0);

        assert_eq!(buffer.evict_older_than(10_000.0), 3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.evict_older_than(20_000.0), 0);
    }

    #[test]
    fn first_is_never_older_than_cutoff_after_eviction() {
        let mut buffer = SeriesBuffer::new();
        let mut t = 0.0;
        for i in 0..500 {
            t += 150.0;
            buffer.append(Sample::new(t, i as f64));
            let cutoff = eviction_cutoff(t, 500.0, 100.0, 2_000.0);
            buffer.evict_older_than(cutoff);
            assert!(buffer.first().unwrap().timestamp >= cutoff);
        }
        // 5 s visible + 2 s slack at 150 ms per sample
        assert_eq!(buffer.len(), 47);
    }

    #[test]
    fn out_of_order_append_is_clamped() {
        let buffer = buffer_with(&[100.0, 200.0, 150.0, 300.0]);
        let stamps: Vec<f64> = buffer.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![100.0, 200.0, 200.0, 300.0]);
        assert!(buffer.iter().tuple_windows().all(|(a, b)| a.timestamp <= b.timestamp));
    }

    #[test]
    fn iteration_is_restartable() {
        let buffer = buffer_with(&[1.0, 2.0, 3.0]);
        let iter = buffer.iter();
        assert_eq!(iter.clone().count(), 3);
        assert_eq!(iter.map(|s| s.timestamp).sum::<f64>(), 6.0);
    }

    #[test]
    fn cutoff_covers_visible_width_plus_slack() {
        assert_eq!(eviction_cutoff(10_000.0, 200.0, 100.0, 2_000.0), 6_000.0);
        assert_eq!(eviction_cutoff(10_000.0, -50.0, 100.0, 0.0), 10_000.0);
    }
}
