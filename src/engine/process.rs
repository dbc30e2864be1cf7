//! Stochastic price process and its EMA smoother.
//!
//! The process is advanced with whatever real time elapsed since the last frame
//! and emits fixed-length sub-steps; leftover time is carried to the next call.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::domain::Price;
use crate::utils::maths_utils::{irwin_hall_pair, sine_cycle};

/// Mutable state of the process between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessState {
    pub last_value: Price,
    pub drift: f64,
    pub spike_velocity: f64,
}

/// One fixed-length sub-step produced by [`StochasticProcess::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub raw: Price,
    /// Applied change, already clamped
    pub delta: Price,
    /// How long before the end of the advanced interval this step completed
    pub lag_ms: f64,
}

pub struct StochasticProcess {
    params: SimulationConfig,
    rng: StdRng,
    state: ProcessState,
    /// Real time not yet consumed by a whole step
    accumulator_ms: f64,
    /// Simulation time: steps taken x sample interval
    sim_elapsed_ms: f64,
}

impl StochasticProcess {
    pub fn new(params: &SimulationConfig, seed: u64) -> Self {
        StochasticProcess {
            params: params.clone(),
            rng: StdRng::seed_from_u64(seed),
            state: ProcessState {
                last_value: params.base_price,
                drift: 0.0,
                spike_velocity: 0.0,
            },
            accumulator_ms: 0.0,
            sim_elapsed_ms: 0.0,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn sim_elapsed_ms(&self) -> f64 {
        self.sim_elapsed_ms
    }

    pub fn pending_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Consume `elapsed_ms` of real time, returning every whole step it covers.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<Step> {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.accumulator_ms += elapsed_ms;
        }

        let interval = self.params.sample_interval_ms;
        let count = (self.accumulator_ms / interval).floor() as usize;
        let mut steps = Vec::with_capacity(count);
        for _ in 0..count {
            self.accumulator_ms -= interval;
            let delta = self.step();
            steps.push(Step {
                raw: self.state.last_value,
                delta,
                lag_ms: self.accumulator_ms.max(0.0),
            });
        }
        steps
    }

    /// Multiplier applied to the noise amplitude, cycling smoothly over simulation time.
    pub fn volatility_multiplier(&self) -> f64 {
        let p = &self.params;
        sine_cycle(
            self.sim_elapsed_ms / 1000.0,
            p.vol_cycle_secs,
            p.vol_cycle_min,
            p.vol_cycle_max,
        )
    }

    fn step(&mut self) -> Price {
        let p = &self.params;

        let drift_nudge = (self.rng.random::<f64>() - 0.5) * p.drift_step;
        self.state.drift = (self.state.drift + drift_nudge).clamp(-p.drift_clamp, p.drift_clamp);

        let gaussian = irwin_hall_pair(self.rng.random::<f64>(), self.rng.random::<f64>());
        let volatility = p.noise_amplitude * self.volatility_multiplier();

        if self.rng.random::<f64>() < p.spike_probability {
            let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            self.state.spike_velocity += sign * p.spike_amplitude;
        }
        self.state.spike_velocity *= p.spike_decay;

        let last = self.state.last_value;
        let mean_force = p.mean_revert_strength * (p.mean_revert_to - last);

        let delta = (last * (self.state.drift * p.drift_scale)
            + gaussian * volatility
            + mean_force
            + self.state.spike_velocity)
            .clamp(-p.max_move_per_tick, p.max_move_per_tick);

        self.state.last_value = last + delta;
        self.sim_elapsed_ms += p.sample_interval_ms;
        delta
    }
}

/// Exponential moving average over the raw process output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    alpha: f64,
    value: Price,
}

impl Smoother {
    pub fn new(alpha: f64, initial: Price) -> Self {
        Smoother {
            alpha,
            value: initial,
        }
    }

    pub fn apply(&mut self, raw: Price) -> Price {
        self.value = self.value * (1.0 - self.alpha) + raw * self.alpha;
        self.value
    }

    pub fn value(&self) -> Price {
        self.value
    }
}
