pub mod clock;
pub mod marker;
pub mod sample;

pub use clock::VirtualClock;
pub use marker::{Marker, MarkerKind, TimelineEntry, default_timeline};
pub use sample::{Price, Sample, VirtualTimeMs};
