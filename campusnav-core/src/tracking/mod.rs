//! Per-sample tracking: GPS quality, heading fallback, progress along the
//! active route and the instruction to show.

mod heading;
mod instruction;
mod quality;
mod sample;
mod tracker;

pub use heading::{HeadingOrigin, HeadingTracker};
pub use instruction::Instruction;
pub use quality::GpsQuality;
pub use sample::{HeadingReading, PositionSample};
pub(crate) use tracker::{measure, needs_reroute};
pub use tracker::{Progress, is_debounced, track};
