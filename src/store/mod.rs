//! SQLite persistence for `electric_power_data`.
//!
//! The table is deliberately unconstrained: no primary key, no uniqueness, no
//! indices. Re-ingesting the same window appends duplicate rows.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::debug;

use crate::domain::PowerCostRow;
use crate::error::AppError;

pub const TABLE_NAME: &str = "electric_power_data";

/// Default database file, created in the working directory.
pub const DEFAULT_DB_PATH: &str = "electric_power_data.db";

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS electric_power_data (
        period TEXT,
        location TEXT,
        state_description TEXT,
        sector_id INTEGER,
        sector_description TEXT,
        fuel_type_id TEXT,
        fuel_type_description TEXT,
        cost REAL
    )
";

const INSERT_SQL: &str = "
    INSERT INTO electric_power_data (
        period, location, state_description, sector_id, sector_description,
        fuel_type_id, fuel_type_description, cost
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
";

const SELECT_ALL_SQL: &str = "
    SELECT period, location, state_description, sector_id, sector_description,
           fuel_type_id, fuel_type_description, cost
    FROM electric_power_data
    ORDER BY rowid ASC
";

pub struct PowerCostStore {
    conn: Connection,
}

impl PowerCostStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            AppError::storage(format!("Failed to open database '{}': {e}", path.display()))
        })?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::storage(format!("Failed to open in-memory database: {e}")))?;
        Ok(Self { conn })
    }

    /// Create the table if it does not exist. Safe to call on every run.
    pub fn ensure_schema(&self) -> Result<(), AppError> {
        self.conn
            .execute_batch(CREATE_TABLE_SQL)
            .map_err(|e| AppError::storage(format!("Failed to create table {TABLE_NAME}: {e}")))
    }

    /// Append `rows` in a single transaction.
    ///
    /// Either every row is committed or none is: any failure drops the
    /// transaction, which rolls it back.
    pub fn insert_rows(&mut self, rows: &[PowerCostRow]) -> Result<usize, AppError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| AppError::storage(format!("Failed to begin transaction: {e}")))?;

        {
            let mut stmt = tx
                .prepare(INSERT_SQL)
                .map_err(|e| AppError::storage(format!("Failed to prepare insert: {e}")))?;

            for (idx, row) in rows.iter().enumerate() {
                stmt.execute(params![
                    row.period,
                    row.location,
                    row.state_description,
                    row.sector_id,
                    row.sector_description,
                    row.fuel_type_id,
                    row.fuel_type_description,
                    row.cost,
                ])
                .map_err(|e| {
                    AppError::storage(format!("Failed to insert row {idx} into {TABLE_NAME}: {e}"))
                })?;
            }
        }

        tx.commit()
            .map_err(|e| AppError::storage(format!("Failed to commit insert: {e}")))?;
        debug!(rows = rows.len(), "committed insert batch");
        Ok(rows.len())
    }

    pub fn row_count(&self) -> Result<usize, AppError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM electric_power_data", [], |row| row.get(0))
            .map_err(|e| AppError::storage(format!("Failed to count rows: {e}")))?;
        usize::try_from(count)
            .map_err(|_| AppError::storage(format!("Row count '{count}' cannot be represented as usize")))
    }

    /// Every stored row, in insertion order.
    pub fn rows(&self) -> Result<Vec<PowerCostRow>, AppError> {
        let mut stmt = self
            .conn
            .prepare(SELECT_ALL_SQL)
            .map_err(|e| AppError::storage(format!("Failed to prepare select: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(PowerCostRow {
                    period: row.get(0)?,
                    location: row.get(1)?,
                    state_description: row.get(2)?,
                    sector_id: row.get(3)?,
                    sector_description: row.get(4)?,
                    fuel_type_id: row.get(5)?,
                    fuel_type_description: row.get(6)?,
                    cost: row.get(7)?,
                })
            })
            .map_err(|e| AppError::storage(format!("Failed to read rows: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::storage(format!("Failed to read rows: {e}")))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the underlying connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<(), AppError> {
        self.conn
            .close()
            .map_err(|(_, e)| AppError::storage(format!("Failed to close database: {e}")))
    }
}
