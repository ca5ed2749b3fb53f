//! GiSTX generator CLI.

use clap::{ColorChoice, Parser};
use gistx_cli::logging::{LogConfig, LogFormat, init_logging};
use gistx_cli::types::RunOutcome;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_check, run_columns, run_generate};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Generate(args) => report_outcome(run_generate(args)),
        Command::Check(args) => report_outcome(run_check(args)),
        Command::Columns => match run_columns() {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Prints the run summary and maps the outcome to an exit code.
fn report_outcome(outcome: anyhow::Result<RunOutcome>) -> i32 {
    match outcome {
        Ok(outcome) => {
            print_summary(&outcome);
            if outcome.has_errors() { 1 } else { 0 }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use gistx_cli::types::WorkbookValidation;
    use std::path::PathBuf;

    #[test]
    fn clean_run_exits_zero() {
        let outcome = RunOutcome {
            workbook: PathBuf::from("dictionary.xlsx"),
            validation: WorkbookValidation::default(),
            artifacts: None,
            log_file: None,
        };
        assert_eq!(report_outcome(Ok(outcome)), 0);
    }

    #[test]
    fn failed_run_exits_one() {
        assert_eq!(report_outcome(Err(anyhow::anyhow!("workbook not found"))), 1);
    }

    #[test]
    fn columns_command_succeeds() {
        assert!(run_columns().is_ok());
    }
}
