//! Plain-text rendering of load and query results for the terminal.

use crate::io::ingest::{LoadOutcome, LoadReport};
use crate::report::{FuelTypeCount, QueryResults};

/// Summary line(s) for a finished load of `pages` fetched pages.
pub fn format_load_outcome(outcome: &LoadOutcome, pages: usize) -> String {
    let mut out = format!(
        "Fetched {pages} page{}.\n",
        if pages == 1 { "" } else { "s" }
    );
    match outcome {
        LoadOutcome::Loaded(report) => out.push_str(&format_load_report(report)),
        LoadOutcome::Rejected(err) => out.push_str(&format!("No rows inserted: {err}.\n")),
    }
    out
}

fn format_load_report(report: &LoadReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Inserted {} of {} records",
        report.inserted, report.received
    ));
    if report.skipped > 0 {
        out.push_str(&format!(" ({} skipped: not an object)", report.skipped));
    }
    out.push_str(".\n");
    if report.cost_defaulted > 0 {
        out.push_str(&format!(
            "{} records had no cost; stored as 0.0.\n",
            report.cost_defaulted
        ));
    }
    out
}

/// Render all three example queries.
pub fn format_query_results(results: &QueryResults) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Average cost for {}: {}\n",
        results.average.fuel_type,
        format_value(results.average.average)
    ));
    out.push_str(&format!(
        "Total cost for {} sector: {}\n",
        results.total.sector,
        format_value(results.total.total)
    ));
    out.push_str(&format!(
        "Record count per fuel type in {} (limited): {}\n",
        results.period,
        format_counts(&results.counts)
    ));

    out
}

fn format_value(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.4}"),
        None => "n/a (no matching rows)".to_string(),
    }
}

fn format_counts(counts: &[FuelTypeCount]) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|c| format!("{} = {}", c.fuel_type.as_deref().unwrap_or("<null>"), c.count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ShapeError;
    use crate::report::{AverageCost, SectorTotal};

    #[test]
    fn renders_query_results() {
        let results = QueryResults {
            average: AverageCost {
                fuel_type: "bituminous coal".to_string(),
                average: Some(12.5),
            },
            total: SectorTotal {
                sector: "Electric Utility".to_string(),
                total: None,
            },
            period: "2024-07".to_string(),
            counts: vec![
                FuelTypeCount {
                    fuel_type: Some("bituminous coal".to_string()),
                    count: 1,
                },
                FuelTypeCount {
                    fuel_type: None,
                    count: 4,
                },
            ],
        };

        let text = format_query_results(&results);
        assert!(text.contains("Average cost for bituminous coal: 12.5000"));
        assert!(text.contains("Total cost for Electric Utility sector: n/a"));
        assert!(text.contains("bituminous coal = 1, <null> = 4"));
    }

    #[test]
    fn renders_load_outcomes() {
        let loaded = format_load_outcome(
            &LoadOutcome::Loaded(LoadReport {
                received: 10,
                inserted: 9,
                skipped: 1,
                cost_defaulted: 3,
            }),
            2,
        );
        assert!(loaded.starts_with("Fetched 2 pages.\nInserted 9 of 10 records (1 skipped"));
        assert!(loaded.contains("3 records had no cost"));

        let rejected = format_load_outcome(&LoadOutcome::Rejected(ShapeError::MissingData), 1);
        assert!(rejected.starts_with("Fetched 1 page.\n"));
        assert!(rejected.contains("'data' key not found"));
    }
}
