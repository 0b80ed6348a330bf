//! Example read queries over `electric_power_data`, plus terminal formatting.
//!
//! These are consumers of the stored table only; nothing here writes.

use rusqlite::{OptionalExtension, params};

use crate::domain::QuerySpec;
use crate::error::AppError;
use crate::store::PowerCostStore;

pub mod format;

pub use format::{format_load_outcome, format_query_results};

#[derive(Debug, Clone, PartialEq)]
pub struct AverageCost {
    pub fuel_type: String,
    /// `None` when no rows match.
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorTotal {
    pub sector: String,
    /// `None` when no rows match.
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelTypeCount {
    pub fuel_type: Option<String>,
    pub count: i64,
}

/// Results of all three example queries.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    pub average: AverageCost,
    pub total: SectorTotal,
    pub period: String,
    pub counts: Vec<FuelTypeCount>,
}

/// Run the three example queries with the parameters in `spec`.
pub fn run_queries(store: &PowerCostStore, spec: &QuerySpec) -> Result<QueryResults, AppError> {
    Ok(QueryResults {
        average: AverageCost {
            fuel_type: spec.fuel_type.clone(),
            average: average_cost_for_fuel(store, &spec.fuel_type)?,
        },
        total: SectorTotal {
            sector: spec.sector.clone(),
            total: total_cost_for_sector(store, &spec.sector)?,
        },
        period: spec.period.clone(),
        counts: count_by_fuel_type(store, &spec.period, spec.limit)?,
    })
}

/// Average `cost` over rows with the given fuel type description.
pub fn average_cost_for_fuel(store: &PowerCostStore, fuel_type: &str) -> Result<Option<f64>, AppError> {
    aggregate(
        store,
        "SELECT AVG(cost) FROM electric_power_data WHERE fuel_type_description = ?1",
        fuel_type,
    )
}

/// Sum of `cost` over rows with the given sector description.
pub fn total_cost_for_sector(store: &PowerCostStore, sector: &str) -> Result<Option<f64>, AppError> {
    aggregate(
        store,
        "SELECT SUM(cost) FROM electric_power_data WHERE sector_description = ?1",
        sector,
    )
}

/// Row count per fuel type for one period, at most `limit` groups.
pub fn count_by_fuel_type(
    store: &PowerCostStore,
    period: &str,
    limit: usize,
) -> Result<Vec<FuelTypeCount>, AppError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = store
        .connection()
        .prepare(
            "
            SELECT fuel_type_description, COUNT(*)
            FROM electric_power_data
            WHERE period = ?1
            GROUP BY fuel_type_description
            ORDER BY fuel_type_description
            LIMIT ?2
            ",
        )
        .map_err(|e| AppError::storage(format!("Failed to prepare fuel type count: {e}")))?;

    let rows = stmt
        .query_map(params![period, limit], |row| {
            Ok(FuelTypeCount {
                fuel_type: row.get(0)?,
                count: row.get(1)?,
            })
        })
        .map_err(|e| AppError::storage(format!("Failed to count fuel types: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::storage(format!("Failed to count fuel types: {e}")))
}

fn aggregate(store: &PowerCostStore, sql: &str, arg: &str) -> Result<Option<f64>, AppError> {
    store
        .connection()
        .query_row(sql, params![arg], |row| row.get::<_, Option<f64>>(0))
        .optional()
        .map(Option::flatten)
        .map_err(|e| AppError::storage(format!("Query failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Page;
    use crate::io::ingest::load_pages;
    use serde_json::{Value, json};

    fn record(period: &str, fuel: &str, sector: &str, cost: Option<f64>) -> Value {
        let mut rec = json!({
            "period": period,
            "location": "US",
            "stateDescription": "United States",
            "sectorid": 1,
            "sectorDescription": sector,
            "fueltypeid": "X",
            "fuelTypeDescription": fuel,
        });
        if let Some(cost) = cost {
            rec["cost"] = json!(cost);
        }
        rec
    }

    fn loaded(records: Vec<Value>) -> PowerCostStore {
        let mut store = PowerCostStore::in_memory().unwrap();
        let document = json!({ "response": { "data": records } });
        load_pages(&mut store, &[Page { offset: 0, document }]).unwrap();
        store
    }

    #[test]
    fn single_coal_record_scenario() {
        let store = loaded(vec![json!({
            "period": "2024-07",
            "location": "US",
            "stateDescription": "United States",
            "sectorid": 1,
            "sectorDescription": "Electric Utility",
            "fueltypeid": "COL",
            "fuelTypeDescription": "bituminous coal",
            "cost": 12.5
        })]);

        assert_eq!(average_cost_for_fuel(&store, "bituminous coal").unwrap(), Some(12.5));
        assert_eq!(
            count_by_fuel_type(&store, "2024-07", 3).unwrap(),
            vec![FuelTypeCount {
                fuel_type: Some("bituminous coal".to_string()),
                count: 1,
            }]
        );
    }

    #[test]
    fn omitted_cost_scenario_averages_to_zero() {
        let store = loaded(vec![record("2024-07", "bituminous coal", "Electric Utility", None)]);
        assert_eq!(store.rows().unwrap()[0].cost, 0.0);
        assert_eq!(average_cost_for_fuel(&store, "bituminous coal").unwrap(), Some(0.0));
    }

    #[test]
    fn aggregates_over_matching_rows_only() {
        let store = loaded(vec![
            record("2024-07", "bituminous coal", "Electric Utility", Some(10.0)),
            record("2024-06", "bituminous coal", "Electric Utility", Some(20.0)),
            record("2024-07", "natural gas", "Electric Utility", Some(5.0)),
            record("2024-07", "natural gas", "Commercial", Some(100.0)),
        ]);

        assert_eq!(average_cost_for_fuel(&store, "bituminous coal").unwrap(), Some(15.0));
        assert_eq!(total_cost_for_sector(&store, "Electric Utility").unwrap(), Some(35.0));
        assert_eq!(total_cost_for_sector(&store, "Commercial").unwrap(), Some(100.0));
    }

    #[test]
    fn no_matching_rows_is_none() {
        let store = loaded(vec![]);
        assert_eq!(average_cost_for_fuel(&store, "bituminous coal").unwrap(), None);
        assert_eq!(total_cost_for_sector(&store, "Electric Utility").unwrap(), None);
        assert!(count_by_fuel_type(&store, "2024-07", 3).unwrap().is_empty());
    }

    #[test]
    fn fuel_type_counts_respect_period_and_limit() {
        let store = loaded(vec![
            record("2024-07", "wind", "Electric Utility", Some(1.0)),
            record("2024-07", "coal", "Electric Utility", Some(1.0)),
            record("2024-07", "coal", "Electric Utility", Some(1.0)),
            record("2024-07", "solar", "Electric Utility", Some(1.0)),
            record("2024-07", "nuclear", "Electric Utility", Some(1.0)),
            record("2024-06", "hydro", "Electric Utility", Some(1.0)),
        ]);

        let counts = count_by_fuel_type(&store, "2024-07", 3).unwrap();
        let got: Vec<(Option<&str>, i64)> = counts
            .iter()
            .map(|c| (c.fuel_type.as_deref(), c.count))
            .collect();
        assert_eq!(got, vec![(Some("coal"), 2), (Some("nuclear"), 1), (Some("solar"), 1)]);
    }

    #[test]
    fn run_queries_uses_spec_parameters() {
        let store = loaded(vec![record("2024-07", "bituminous coal", "Electric Utility", Some(2.0))]);
        let results = run_queries(&store, &QuerySpec::default()).unwrap();
        assert_eq!(results.average.average, Some(2.0));
        assert_eq!(results.total.total, Some(2.0));
        assert_eq!(results.period, "2024-07");
        assert_eq!(results.counts.len(), 1);
    }
}
