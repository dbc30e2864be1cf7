//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every check site is additionally gated by
//! `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit mean / std-dev of recent process steps every few hundred steps.
    pub print_process_stats: bool,
    /// Emit a line per placed / evicted marker.
    pub print_marker_events: bool,
    /// Emit container resize and panel re-measure events.
    pub print_surface_events: bool,
    /// Emit mount / unmount / listener attach-detach transitions.
    pub print_lifecycle: bool,
    /// Dump the effective configuration at mount.
    pub print_config: bool,
    /// Recent step deltas kept for the process statistics.
    pub stats_window: usize,
    /// Steps between two statistics reports.
    pub stats_report_every: usize,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_process_stats: false,
    print_marker_events: true,
    print_surface_events: false,
    print_lifecycle: true,
    print_config: false,
    stats_window: 200,
    stats_report_every: 400,
};
