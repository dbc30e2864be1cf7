pub mod core;
pub mod diagnostics;
pub mod markers;
pub mod process;
pub mod scheduler;
pub mod series;

// Re-export key components
pub use core::{ChartEngine, TickReport};
pub use diagnostics::{ProcessStats, StepSummary};
pub use markers::{
    ExternalClockTrigger, MarkerSynchronizer, MarkerTrigger, SelfTimerTrigger, TriggerInput,
};
pub use process::{ProcessState, Smoother, Step, StochasticProcess};
pub use scheduler::{FrameScheduler, FrameTicket, ListenerKind, ListenerRegistry, RunGate};
pub use series::{SeriesBuffer, eviction_cutoff};
