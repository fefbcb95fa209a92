//! Commentary ingestion: raw annotation records → immutable second-indexed timeline.

pub mod builder;
pub mod event;

pub use builder::{IngestReport, InputFormat, Timeline, build_timeline, load_timeline};
pub use event::{Event, format_clock, parse_match_time};
