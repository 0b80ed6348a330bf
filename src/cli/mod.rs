//! Command-line parsing for the EIA power cost loader.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/load/query code. Defaults reproduce the fixed request and queries the
//! tool was first written around, so a bare `eia` needs no flags at all.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{MAX_PAGE_LENGTH, SortDirection, YearMonth};
use crate::store::DEFAULT_DB_PATH;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eia", version, about = "Load EIA monthly electricity cost data into SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch from the EIA API, load into SQLite, then print the example queries.
    Run(RunArgs),
    /// Fetch and load only.
    Ingest(IngestArgs),
    /// Print the example queries against an existing database.
    Report(ReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub storage: StorageArgs,
    #[command(flatten)]
    pub fetch: FetchArgs,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Args, Clone)]
pub struct IngestArgs {
    #[command(flatten)]
    pub storage: StorageArgs,
    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub storage: StorageArgs,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Args, Clone)]
pub struct StorageArgs {
    /// SQLite database file (created if missing).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,
}

/// Which slice of the dataset to request.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// First month to request (YYYY-MM, inclusive).
    #[arg(long, default_value = "2024-01")]
    pub start: YearMonth,

    /// Last month to request (YYYY-MM, inclusive).
    #[arg(long, default_value = "2024-07")]
    pub end: YearMonth,

    /// Row offset of the first page.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Rows per page (the API allows at most 5000).
    #[arg(long, default_value_t = MAX_PAGE_LENGTH)]
    pub length: usize,

    /// Sort direction on `period`.
    #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
    pub sort_direction: SortDirection,

    /// Keep requesting pages until the API reports no more rows.
    #[arg(long)]
    pub all_pages: bool,

    /// HTTP request timeout in seconds (no timeout if unset).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Parameters for the example queries.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// Fuel type description for the average-cost query.
    #[arg(long, default_value = "bituminous coal")]
    pub fuel_type: String,

    /// Sector description for the total-cost query.
    #[arg(long, default_value = "Electric Utility")]
    pub sector: String,

    /// Period (YYYY-MM) for the per-fuel-type count.
    #[arg(long, default_value = "2024-07")]
    pub period: String,

    /// Maximum number of fuel types in the count.
    #[arg(long, default_value_t = 3)]
    pub limit: usize,
}
