//! Remote data access: the EIA v2 client and its response envelope.

pub mod eia;
pub mod envelope;

pub use eia::{EiaClient, EiaConfig, Page};
pub use envelope::ShapeError;
