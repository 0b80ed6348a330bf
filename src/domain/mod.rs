//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the request window sent to the API (`FetchWindow`, `YearMonth`)
//! - decoded API observations (`RawRecord`) and persisted rows (`PowerCostRow`)
//! - parameters for the example queries (`QuerySpec`)

pub mod types;

pub use types::*;
