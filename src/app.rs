//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (`.env` credential + flags)
//! - runs the fetch/load/query pipeline
//! - prints the summaries

use std::path::Path;
use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, FetchArgs, IngestArgs, QueryArgs, ReportArgs, RunArgs};
use crate::data::EiaConfig;
use crate::domain::{FetchWindow, QuerySpec};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `eia` binary.
pub fn run() -> Result<(), AppError> {
    // `eia` on its own (or with only flags) behaves like `eia run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Ingest(args) => handle_ingest(args),
        Command::Report(args) => handle_report(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let window = fetch_window_from_args(&args.fetch)?;
    let config = eia_config(&args.fetch)?;
    let spec = query_spec_from_args(&args.query);

    let run = pipeline::run_all(&args.storage.db, config, &window, &spec)?;

    print!("{}", crate::report::format_load_outcome(&run.outcome, run.pages));
    print!("{}", crate::report::format_query_results(&run.results));
    Ok(())
}

fn handle_ingest(args: IngestArgs) -> Result<(), AppError> {
    let window = fetch_window_from_args(&args.fetch)?;
    let config = eia_config(&args.fetch)?;

    let run = pipeline::run_ingest(&args.storage.db, config, &window)?;

    print!("{}", crate::report::format_load_outcome(&run.outcome, run.pages));
    print_db_location(&args.storage.db);
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let spec = query_spec_from_args(&args.query);
    let results = pipeline::run_report(&args.storage.db, &spec)?;
    print!("{}", crate::report::format_query_results(&results));
    Ok(())
}

fn eia_config(args: &FetchArgs) -> Result<EiaConfig, AppError> {
    Ok(EiaConfig::from_env()?.with_timeout(args.timeout.map(Duration::from_secs)))
}

fn print_db_location(path: &Path) {
    println!("Database: {}", path.display());
}

pub fn fetch_window_from_args(args: &FetchArgs) -> Result<FetchWindow, AppError> {
    let window = FetchWindow {
        start: args.start,
        end: args.end,
        sort_direction: args.sort_direction,
        offset: args.offset,
        length: args.length,
        all_pages: args.all_pages,
    };
    window.validate()?;
    Ok(window)
}

pub fn query_spec_from_args(args: &QueryArgs) -> QuerySpec {
    QuerySpec {
        fuel_type: args.fuel_type.clone(),
        sector: args.sector.clone(),
        period: args.period.clone(),
        limit: args.limit,
    }
}

/// Rewrite argv so `eia` defaults to `eia run`.
///
/// Rules:
/// - `eia`                      -> `eia run`
/// - `eia --start 2023-01 ...`  -> `eia run --start 2023-01 ...`
/// - `eia --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["eia"])), argv(&["eia", "run"]));
        assert_eq!(
            rewrite_args(argv(&["eia", "--all-pages"])),
            argv(&["eia", "run", "--all-pages"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let cases: [&[&str]; 4] = [
            &["eia", "report"],
            &["eia", "--help"],
            &["eia", "-V"],
            &["eia", "ingest", "--db", "x"],
        ];
        for args in cases {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn window_from_default_flags_is_valid() {
        let cli = Cli::parse_from(rewrite_args(argv(&["eia"])));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let window = fetch_window_from_args(&args.fetch).unwrap();
        assert_eq!(window, FetchWindow::default());
        assert_eq!(query_spec_from_args(&args.query), QuerySpec::default());
    }

    #[test]
    fn reversed_window_is_a_config_error() {
        let cli = Cli::parse_from(argv(&["eia", "ingest", "--start", "2024-08", "--end", "2024-01"]));
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        let err = fetch_window_from_args(&args.fetch).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }
}
