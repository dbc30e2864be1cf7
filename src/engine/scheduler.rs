//! Cooperative frame scheduling and listener bookkeeping.
//!
//! The host calls back once per display frame. A [`FrameScheduler`] keeps at
//! most one pending [`FrameTicket`]; a ticket issued before `stop()` (or from an
//! older generation) is rejected, so a torn-down instance never runs a stray
//! frame.

use std::collections::HashSet;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Handle for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    running: bool,
    generation: u64,
    next_seq: u64,
    pending: Option<FrameTicket>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new callback chain and return its first ticket.
    pub fn start(&mut self) -> FrameTicket {
        self.running = true;
        self.generation += 1;
        self.pending = None;
        self.issue()
    }

    /// Request the next frame. Re-requesting while a ticket is pending returns
    /// that same ticket. `None` once stopped.
    pub fn request(&mut self) -> Option<FrameTicket> {
        if !self.running {
            return None;
        }
        Some(match self.pending {
            Some(ticket) => ticket,
            None => self.issue(),
        })
    }

    /// Consume a ticket at callback time. Only the pending ticket of the
    /// current generation is accepted; anything else is a no-op frame.
    pub fn accept(&mut self, ticket: FrameTicket) -> bool {
        if self.running && self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.pending = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    fn issue(&mut self) -> FrameTicket {
        self.next_seq += 1;
        let ticket = FrameTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.pending = Some(ticket);
        ticket
    }
}

/// External signals a mounted chart listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ListenerKind {
    ContainerResize,
    PanelReady,
    Visibility,
    PlaybackReady,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    attached: HashSet<ListenerKind>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `kind` was already attached.
    pub fn attach(&mut self, kind: ListenerKind) -> bool {
        let added = self.attached.insert(kind);
        #[cfg(debug_assertions)]
        if added && DEBUG_FLAGS.print_lifecycle {
            log::info!("Listener attached: {kind}");
        }
        added
    }

    /// Detaching a listener that was never attached is a no-op returning false.
    pub fn detach(&mut self, kind: ListenerKind) -> bool {
        let removed = self.attached.remove(&kind);
        #[cfg(debug_assertions)]
        if removed && DEBUG_FLAGS.print_lifecycle {
            log::info!("Listener detached: {kind}");
        }
        removed
    }

    pub fn attach_all(&mut self) {
        for kind in ListenerKind::iter() {
            self.attach(kind);
        }
    }

    /// Returns how many listeners were actually attached before the call.
    pub fn detach_all(&mut self) -> usize {
        ListenerKind::iter().filter(|&kind| self.detach(kind)).count()
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.attached.contains(&kind)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

/// Visibility gate consulted before advancing or scheduling.
#[derive(Debug, Clone, Copy)]
pub struct RunGate {
    visible: bool,
}

impl Default for RunGate {
    fn default() -> Self {
        RunGate { visible: true }
    }
}

impl RunGate {
    /// Returns true when this call made the gate newly eligible.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let resumed = visible && !self.visible;
        self.visible = visible;
        resumed
    }

    pub fn is_eligible_to_run(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_ticket_is_live() {
        let mut scheduler = FrameScheduler::new();
        let first = scheduler.start();
        assert_eq!(scheduler.request(), Some(first));

        assert!(scheduler.accept(first));
        // Re-delivering the same callback does nothing
        assert!(!scheduler.accept(first));

        let second = scheduler.request().unwrap();
        assert_ne!(first, second);
        assert!(scheduler.accept(second));
    }

    #[test]
    fn stopped_scheduler_rejects_in_flight_frame() {
        let mut scheduler = FrameScheduler::new();
        let ticket = scheduler.start();
        scheduler.stop();

        assert!(!scheduler.accept(ticket));
        assert_eq!(scheduler.request(), None);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn restart_invalidates_old_generation() {
        let mut scheduler = FrameScheduler::new();
        let old = scheduler.start();
        scheduler.stop();
        let fresh = scheduler.start();

        assert!(!scheduler.accept(old));
        assert!(scheduler.accept(fresh));
    }

    #[test]
    fn detach_is_defensive() {
        let mut listeners = ListenerRegistry::new();
        assert!(!listeners.detach(ListenerKind::Visibility));

        listeners.attach_all();
        assert_eq!(listeners.attached_count(), 4);
        assert!(!listeners.attach(ListenerKind::PanelReady));

        assert_eq!(listeners.detach_all(), 4);
        assert_eq!(listeners.detach_all(), 0);
        assert!(!listeners.is_attached(ListenerKind::ContainerResize));
    }

    #[test]
    fn gate_reports_resume_once() {
        let mut gate = RunGate::default();
        assert!(gate.is_eligible_to_run());
        assert!(!gate.set_visible(true));
        assert!(!gate.set_visible(false));
        assert!(!gate.is_eligible_to_run());
        assert!(gate.set_visible(true));
        assert!(!gate.set_visible(true));
    }
}
