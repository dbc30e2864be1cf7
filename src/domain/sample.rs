/// Milliseconds on the engine's virtual clock (see [`super::VirtualClock`]).
pub type VirtualTimeMs = f64;

/// A simulated price. Never a real market quote.
pub type Price = f64;

// One committed point of the smoothed series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: VirtualTimeMs,
    pub value: Price,
}

impl Sample {
    pub fn new(timestamp: VirtualTimeMs, value: Price) -> Self {
        Sample { timestamp, value }
    }
}
