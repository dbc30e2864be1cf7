//! Configuration module for the chart engine.

pub mod chart;

mod debug; // Private: use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod style;

// Re-export commonly used items
pub use chart::{
    ChartConfig, LabelConfig, LayoutConfig, MarkerConfig, MarkerMode, ScaleConfig,
    SimulationConfig, WindowMode,
};
pub use style::ChartStyle;
