//! Marker synchronisation.
//!
//! Two interchangeable trigger strategies decide *when* a marker fires and of
//! which kind; [`MarkerSynchronizer`] turns a firing into a [`Marker`] pinned to
//! the current sample and keeps the list the renderer reads.

use std::collections::{HashMap, VecDeque};

use crate::config::{MarkerConfig, MarkerMode};
use crate::domain::{Marker, MarkerKind, Sample, TimelineEntry, VirtualTimeMs};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Clocks available to a trigger on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerInput {
    pub now_ms: VirtualTimeMs,
    /// Engine time since mount
    pub engine_elapsed_ms: f64,
    /// External playback position; `None` while the source is not ready
    pub playback_position_secs: Option<f64>,
}

/// A strategy deciding when a new marker fires.
pub trait MarkerTrigger {
    /// Called once per frame while a current sample exists. Returning a kind
    /// means a marker of that kind is placed this frame.
    fn poll(&mut self, input: &TriggerInput) -> Option<MarkerKind>;

    fn name(&self) -> &'static str;
}

// ============================================================================
// External clock: pre-authored timeline vs. playback position
// ============================================================================
pub struct ExternalClockTrigger {
    timeline: Vec<TimelineEntry>,
    active_window_secs: f64,
    debounce_ms: f64,
    /// Timeline entry active on the previous frame
    active_entry: Option<usize>,
    last_position_secs: Option<f64>,
    last_placed_ms: HashMap<MarkerKind, VirtualTimeMs>,
}

impl ExternalClockTrigger {
    pub fn new(timeline: Vec<TimelineEntry>, active_window_secs: f64, debounce_ms: f64) -> Self {
        ExternalClockTrigger {
            timeline,
            active_window_secs,
            debounce_ms,
            active_entry: None,
            last_position_secs: None,
            last_placed_ms: HashMap::new(),
        }
    }

    /// Latest-starting entry whose window contains `position_secs`.
    fn entry_at(&self, position_secs: f64) -> Option<usize> {
        self.timeline
            .iter()
            .rposition(|entry| entry.is_active_at(position_secs, self.active_window_secs))
    }

    fn active_kind(&self) -> Option<MarkerKind> {
        self.active_entry.map(|idx| self.timeline[idx].kind)
    }
}

impl MarkerTrigger for ExternalClockTrigger {
    fn poll(&mut self, input: &TriggerInput) -> Option<MarkerKind> {
        let position = input.playback_position_secs?;

        // Position went backwards: the media looped. Placed markers stay put.
        if self.last_position_secs.is_some_and(|prev| position < prev) {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_marker_events {
                log::info!("Timeline loop restart at {position:.3}s");
            }
            self.active_entry = None;
        }
        self.last_position_secs = Some(position);

        let Some(idx) = self.entry_at(position) else {
            self.active_entry = None;
            return None;
        };
        if self.active_entry == Some(idx) {
            return None;
        }

        let kind = self.timeline[idx].kind;
        let kind_changed = self.active_kind() != Some(kind);
        let stale = self
            .last_placed_ms
            .get(&kind)
            .is_none_or(|&placed| input.now_ms - placed >= self.debounce_ms);
        self.active_entry = Some(idx);

        if kind_changed || stale {
            self.last_placed_ms.insert(kind, input.now_ms);
            Some(kind)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "external-clock"
    }
}

// ============================================================================
// Self timer: alternate long/short on engine time
// ============================================================================
pub struct SelfTimerTrigger {
    interval_ms: f64,
    next_due_ms: f64,
    next_kind: MarkerKind,
}

impl SelfTimerTrigger {
    pub fn new(initial_delay_ms: f64, interval_ms: f64) -> Self {
        SelfTimerTrigger {
            interval_ms,
            next_due_ms: initial_delay_ms,
            next_kind: MarkerKind::Long,
        }
    }
}

impl MarkerTrigger for SelfTimerTrigger {
    fn poll(&mut self, input: &TriggerInput) -> Option<MarkerKind> {
        let elapsed = input.engine_elapsed_ms;
        if elapsed < self.next_due_ms {
            return None;
        }

        let kind = self.next_kind;
        self.next_kind = kind.opposite();
        self.next_due_ms += self.interval_ms;
        // After a long stall, fire once and re-phase instead of bursting
        if self.next_due_ms <= elapsed {
            self.next_due_ms = elapsed + self.interval_ms;
        }
        Some(kind)
    }

    fn name(&self) -> &'static str {
        "self-timer"
    }
}

// ============================================================================
// Synchronizer
// ============================================================================
pub struct MarkerSynchronizer {
    trigger: Box<dyn MarkerTrigger>,
    markers: VecDeque<Marker>,
    max_markers: usize,
}

impl MarkerSynchronizer {
    pub fn new(trigger: Box<dyn MarkerTrigger>, max_markers: usize) -> Self {
        MarkerSynchronizer {
            trigger,
            markers: VecDeque::new(),
            max_markers: max_markers.max(1),
        }
    }

    /// Build the strategy selected by configuration.
    pub fn from_config(config: &MarkerConfig) -> Self {
        let trigger: Box<dyn MarkerTrigger> = match config.mode {
            MarkerMode::SelfTimer => Box::new(SelfTimerTrigger::new(
                config.initial_delay_ms,
                config.interval_ms,
            )),
            MarkerMode::ExternalClock => Box::new(ExternalClockTrigger::new(
                config.timeline.clone(),
                config.active_window_secs,
                config.debounce_ms,
            )),
        };
        Self::new(trigger, config.max_markers)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.trigger.name()
    }

    /// Poll the trigger and place a marker on `current` if it fires. With no
    /// current sample the trigger is not consulted, so nothing is consumed.
    pub fn sync(&mut self, input: &TriggerInput, current: Option<&Sample>) -> Option<Marker> {
        let current = current?;
        let kind = self.trigger.poll(input)?;
        let marker = Marker::capture(current, kind);

        self.markers.push_back(marker);
        while self.markers.len() > self.max_markers {
            self.markers.pop_front();
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_marker_events {
            log::info!(
                "[{}] {} marker at {:.2}",
                self.trigger.name(),
                marker.kind,
                marker.value
            );
        }
        Some(marker)
    }

    /// Remove markers whose rendered x has scrolled past `-margin_px`.
    /// `x_of` maps a marker to its current pixel column.
    pub fn evict_offscreen(&mut self, margin_px: f32, x_of: impl Fn(&Marker) -> f32) -> usize {
        let before = self.markers.len();
        self.markers.retain(|marker| x_of(marker) >= -margin_px);
        let evicted = before - self.markers.len();

        #[cfg(debug_assertions)]
        if evicted > 0 && DEBUG_FLAGS.print_marker_events {
            log::info!("Evicted {evicted} off-screen marker(s)");
        }
        evicted
    }

    pub fn markers(&self) -> impl DoubleEndedIterator<Item = &Marker> + ExactSizeIterator + '_ {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
