use chrono::Utc;

use super::sample::VirtualTimeMs;

/// Monotonic chart clock.
///
/// Anchored once to a wall-clock timestamp, then advanced only by the elapsed
/// frame time the host reports. Adjusting the system clock mid-session
/// therefore never makes the series jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualClock {
    anchor_ms: VirtualTimeMs,
    elapsed_ms: f64,
}

impl VirtualClock {
    /// Anchor to the current UTC wall clock.
    pub fn anchored_now() -> Self {
        Self::anchored_at(Utc::now().timestamp_millis() as f64)
    }

    pub fn anchored_at(anchor_ms: VirtualTimeMs) -> Self {
        VirtualClock {
            anchor_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt_ms: f64) {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
    }

    pub fn now_ms(&self) -> VirtualTimeMs {
        self.anchor_ms + self.elapsed_ms
    }

    pub fn anchor_ms(&self) -> VirtualTimeMs {
        self.anchor_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_forward() {
        let mut clock = VirtualClock::anchored_at(10_000.0);
        clock.advance(16.0);
        clock.advance(-5.0);
        clock.advance(f64::NAN);
        clock.advance(4.0);

        assert_eq!(clock.now_ms(), 10_020.0);
        assert_eq!(clock.elapsed_ms(), 20.0);
    }
}
