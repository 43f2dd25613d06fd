//! Streaming time-series engine behind the strip chart: aligned sample
//! ingest, per-series history and windowing, auto-ranging, viewport easing
//! and idle degradation.  Nothing in this crate knows about pixels.

pub mod error;
pub mod event;
pub mod idle;
pub mod sample;
pub mod series;
pub mod session;
pub mod viewport;

pub use error::{Result, StripError};
pub use event::{IngestEvent, Message};
pub use idle::IdleGuard;
pub use sample::{Metric, Sample};
pub use series::{DisplayRange, Series, SeriesSpec};
pub use session::{Session, SessionSettings};
pub use viewport::Viewport;
