//! Chart rendering: pixel mapping, the surface abstraction and the layer stack.

pub mod coords;
pub mod curve;
pub mod layers;
pub mod metrics;
pub mod pipeline;
pub mod surface;

pub use coords::{CoordinateMapper, ViewWindow};
pub use layers::{ChartLayer, LayerContext};
pub use metrics::SurfaceMetrics;
pub use pipeline::{FrameInput, RenderPipeline};
pub use surface::{ChartSurface, CubicSegment, PainterSurface};
