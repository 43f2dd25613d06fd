pub mod client;
pub mod payload;

pub use client::{IngestClient, IngestStream};
pub use payload::parse_payload;
