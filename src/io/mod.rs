//! Input handling: mapping fetched pages into stored rows (`ingest`).

pub mod ingest;

pub use ingest::*;
