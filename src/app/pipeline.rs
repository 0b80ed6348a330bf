//! Shared fetch → load → query workflow used by every subcommand.
//!
//! Order of operations for a full run:
//! fetch pages -> open store -> ensure schema -> insert (one transaction) ->
//! example queries -> close.

use std::path::Path;

use tracing::warn;

use crate::data::envelope::api_error;
use crate::data::{EiaClient, EiaConfig, Page};
use crate::domain::{FetchWindow, QuerySpec};
use crate::error::AppError;
use crate::io::ingest::{LoadOutcome, load_pages};
use crate::report::{QueryResults, run_queries};
use crate::store::PowerCostStore;

/// Outputs of an `eia run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub pages: usize,
    pub outcome: LoadOutcome,
    pub results: QueryResults,
}

/// Outputs of an `eia ingest`.
#[derive(Debug, Clone)]
pub struct IngestOutput {
    pub pages: usize,
    pub outcome: LoadOutcome,
}

/// Fetch, load, and query.
pub fn run_all(
    db_path: &Path,
    config: EiaConfig,
    window: &FetchWindow,
    spec: &QuerySpec,
) -> Result<RunOutput, AppError> {
    let pages = fetch_pages(config, window)?;

    let mut store = PowerCostStore::open(db_path)?;
    let (outcome, results) = load_and_query(&mut store, &pages, spec)?;
    store.close()?;

    Ok(RunOutput {
        pages: pages.len(),
        outcome,
        results,
    })
}

/// Fetch and load.
pub fn run_ingest(db_path: &Path, config: EiaConfig, window: &FetchWindow) -> Result<IngestOutput, AppError> {
    let pages = fetch_pages(config, window)?;

    let mut store = PowerCostStore::open(db_path)?;
    let outcome = load_checked(&mut store, &pages)?;
    store.close()?;

    Ok(IngestOutput {
        pages: pages.len(),
        outcome,
    })
}

/// Query an existing database. The schema is ensured first so a fresh file
/// yields empty results rather than an error.
pub fn run_report(db_path: &Path, spec: &QuerySpec) -> Result<QueryResults, AppError> {
    let store = PowerCostStore::open(db_path)?;
    store.ensure_schema()?;
    let results = run_queries(&store, spec)?;
    store.close()?;
    Ok(results)
}

/// Load already-fetched pages and run the example queries over the result.
///
/// A shape error is not fatal: it is logged and the queries still run over
/// whatever the table already held.
pub fn load_and_query(
    store: &mut PowerCostStore,
    pages: &[Page],
    spec: &QuerySpec,
) -> Result<(LoadOutcome, QueryResults), AppError> {
    let outcome = load_checked(store, pages)?;
    let results = run_queries(store, spec)?;
    Ok((outcome, results))
}

fn fetch_pages(config: EiaConfig, window: &FetchWindow) -> Result<Vec<Page>, AppError> {
    window.validate()?;
    let client = EiaClient::new(config)?;
    client.fetch(window)
}

fn load_checked(store: &mut PowerCostStore, pages: &[Page]) -> Result<LoadOutcome, AppError> {
    let outcome = load_pages(store, pages)?;
    if let LoadOutcome::Rejected(err) = outcome {
        let api_message = pages.first().and_then(|p| api_error(&p.document));
        warn!(error = %err, api_error = ?api_message, "unexpected response shape; no rows inserted");
    }
    Ok(outcome)
}
