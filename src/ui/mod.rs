// User interface and host integration
pub mod app;
pub mod instance;
pub mod playback;
pub mod surface_controller;
pub mod ui_render;
pub mod utils;

// Re-export main app
pub use app::{PlaybackOptions, PulseChartApp};
pub use instance::{ChartInstance, FrameOutcome, HostEvent};
pub use playback::LoopingPlaybackClock;
pub use crate::render::SurfaceMetrics;
pub use surface_controller::{PanelWidthSource, PlaybackSource, SurfaceController};
