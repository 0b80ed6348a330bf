//! Loading fetched pages into SQLite.
//!
//! This module turns loosely-shaped API records into `PowerCostRow`s and
//! persists them:
//! - **Shape guard** first: a page without `response.data` inserts nothing and
//!   is reported back as a `ShapeError`, not raised
//! - **Null substitution** only for `cost`; every other missing field stays NULL
//! - **One transaction** for the whole batch (see `PowerCostStore::insert_rows`)

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::Page;
use crate::data::envelope::{ShapeError, response_data};
use crate::domain::{PowerCostRow, RawRecord};
use crate::error::AppError;
use crate::store::PowerCostStore;

/// Counts for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Items seen across all `response.data` arrays.
    pub received: usize,
    pub inserted: usize,
    /// Items that were not JSON objects.
    pub skipped: usize,
    /// Rows stored with the default cost because the source had none.
    pub cost_defaulted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadReport),
    /// The first page had no usable record array; nothing was inserted.
    Rejected(ShapeError),
}

/// Rows mapped from one or more record arrays, not yet persisted.
#[derive(Debug, Clone, Default)]
pub struct RowBatch {
    pub rows: Vec<PowerCostRow>,
    pub received: usize,
    pub skipped: usize,
    pub cost_defaulted: usize,
}

impl RowBatch {
    pub fn extend_from(&mut self, data: &[Value]) {
        self.rows.reserve(data.len());
        for (idx, item) in data.iter().enumerate() {
            self.received += 1;
            match map_record(item) {
                Some(raw) => {
                    if raw.cost.is_none() {
                        self.cost_defaulted += 1;
                    }
                    self.rows.push(PowerCostRow::from(raw));
                }
                None => {
                    debug!(index = idx, "skipping non-object record");
                    self.skipped += 1;
                }
            }
        }
    }
}

/// Decode one `response.data` item. Only non-objects are rejected.
pub fn map_record(item: &Value) -> Option<RawRecord> {
    if !item.is_object() {
        return None;
    }
    RawRecord::deserialize(item).ok()
}

/// Ensure the schema, then insert the records of every page in one transaction.
///
/// A malformed first page rejects the whole load. A malformed later page ends
/// the batch at that page; earlier pages are still inserted.
pub fn load_pages(store: &mut PowerCostStore, pages: &[Page]) -> Result<LoadOutcome, AppError> {
    store.ensure_schema()?;

    let mut batch = RowBatch::default();
    for (idx, page) in pages.iter().enumerate() {
        match response_data(&page.document) {
            Ok(data) => batch.extend_from(data),
            Err(err) if idx == 0 => return Ok(LoadOutcome::Rejected(err)),
            Err(err) => {
                warn!(offset = page.offset, error = %err, "ignoring malformed page and the pages after it");
                break;
            }
        }
    }

    let inserted = store.insert_rows(&batch.rows)?;
    let report = LoadReport {
        received: batch.received,
        inserted,
        skipped: batch.skipped,
        cost_defaulted: batch.cost_defaulted,
    };
    info!(
        received = report.received,
        inserted = report.inserted,
        skipped = report.skipped,
        cost_defaulted = report.cost_defaulted,
        "loaded records"
    );
    Ok(LoadOutcome::Loaded(report))
}
