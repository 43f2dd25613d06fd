//! Projection maths for the strip chart.
//!
//! Everything here is pure geometry over [`strip_core`] state; drawing onto
//! an actual canvas lives in `strip-widgets`.

pub mod cursor;
pub mod curve;
pub mod indicator;
pub mod projection;

pub use cursor::CursorReadout;
pub use curve::{catmull_rom, Segment};
pub use indicator::Indicator;
pub use projection::{Projection, INITIAL_RANGE};
