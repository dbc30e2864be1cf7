use super::surface_controller::PlaybackSource;

/// Stand-in for an external media element: becomes ready after a load delay,
/// then plays from zero and loops at `duration_secs`.
#[derive(Debug, Clone)]
pub struct LoopingPlaybackClock {
    duration_secs: f64,
    load_delay_ms: f64,
    elapsed_ms: f64,
}

impl LoopingPlaybackClock {
    pub fn new(duration_secs: f64, load_delay_ms: f64) -> Self {
        LoopingPlaybackClock {
            duration_secs,
            load_delay_ms: load_delay_ms.max(0.0),
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms`. Returns true on the call that made the clock ready.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let was_ready = self.is_ready();
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
        !was_ready && self.is_ready()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

impl PlaybackSource for LoopingPlaybackClock {
    fn position_secs(&self) -> Option<f64> {
        self.is_ready()
            .then(|| position_at(self.elapsed_ms - self.load_delay_ms, self.duration_secs))
    }

    fn is_ready(&self) -> bool {
        self.elapsed_ms >= self.load_delay_ms
    }
}

/// Looped playback position after `played_ms` of play time.
pub fn position_at(played_ms: f64, duration_secs: f64) -> f64 {
    let played = (played_ms / 1000.0).max(0.0);
    if duration_secs > 0.0 && duration_secs.is_finite() {
        played % duration_secs
    } else {
        played
    }
}
