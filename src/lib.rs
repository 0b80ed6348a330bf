//! `eia-power-costs` library crate.
//!
//! The binary (`eia`) is a thin wrapper around this library so that:
//!
//! - the fetch/load/query pipeline is testable without spawning processes
//! - the loader can be driven from any parsed response, not just a live request

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod store;
