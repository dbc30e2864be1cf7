use std::collections::VecDeque;

use statrs::statistics::Statistics;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Rolling summary of recent process steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummary {
    pub count: usize,
    pub mean_delta: f64,
    pub std_dev_delta: f64,
    pub max_abs_delta: f64,
    pub last_value: f64,
}

/// Collects step deltas over a fixed window and reports a summary every
/// `report_every` steps.
#[derive(Debug, Clone)]
pub struct ProcessStats {
    window: VecDeque<f64>,
    capacity: usize,
    report_every: usize,
    since_report: usize,
    total_steps: u64,
    last_value: f64,
}

impl ProcessStats {
    pub fn new(capacity: usize, report_every: usize) -> Self {
        ProcessStats {
            window: VecDeque::with_capacity(capacity),
            capacity: capacity.max(2),
            report_every: report_every.max(1),
            since_report: 0,
            total_steps: 0,
            last_value: 0.0,
        }
    }

    /// Record a step. Returns a summary when a report is due.
    pub fn record(&mut self, delta: f64, value: f64) -> Option<StepSummary> {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(delta);
        self.last_value = value;
        self.total_steps += 1;
        self.since_report += 1;

        if self.since_report < self.report_every {
            return None;
        }
        self.since_report = 0;
        let summary = self.summary()?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_process_stats {
            log::info!(
                "Process: {} steps | mean Δ {:+.5} | σ {:.5} | max |Δ| {:.5} | value {:.2}",
                self.total_steps,
                summary.mean_delta,
                summary.std_dev_delta,
                summary.max_abs_delta,
                summary.last_value
            );
        }
        Some(summary)
    }

    /// Needs at least two recorded steps.
    pub fn summary(&self) -> Option<StepSummary> {
        if self.window.len() < 2 {
            return None;
        }
        Some(StepSummary {
            count: self.window.len(),
            mean_delta: self.window.iter().mean(),
            std_dev_delta: self.window.iter().std_dev(),
            max_abs_delta: self.window.iter().map(|d| d.abs()).fold(0.0, f64::max),
            last_value: self.last_value,
        })
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_on_cadence() {
        let mut stats = ProcessStats::new(10, 4);
        let reports: Vec<_> = (0..12)
            .filter_map(|i| stats.record(if i % 2 == 0 { 1.0 } else { -1.0 }, i as f64))
            .collect();
        assert_eq!(reports.len(), 3);
        assert_eq!(stats.total_steps(), 12);

        let last = reports[2];
        assert_eq!(last.count, 10);
        assert!(last.mean_delta.abs() < 1e-12);
        assert_eq!(last.max_abs_delta, 1.0);
        assert_eq!(last.last_value, 11.0);
    }

    #[test]
    fn single_step_has_no_summary() {
        let mut stats = ProcessStats::new(10, 1);
        assert!(stats.record(0.5, 1.0).is_none());
        assert!(stats.record(0.5, 1.5).is_some());
    }
}
