//! CLI argument definitions for the GiSTX generator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use gistx_cli::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "gistx",
    version,
    about = "GiSTX generator - validate a data dictionary and build the survey package",
    long_about = "Validate an Excel data dictionary and generate GiSTX survey artifacts.\n\n\
                  Every *_dd / *_xml worksheet becomes one survey XML file; the crfs\n\
                  worksheet feeds survey_manifest.gistx. Nothing is generated unless\n\
                  every worksheet passes validation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write diagnostic logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate the workbook and write the XML files, manifest and ZIP package.
    Generate(GenerateArgs),

    /// Validate the workbook only; nothing is written.
    Check(CheckArgs),

    /// List the data dictionary columns in worksheet order.
    Columns,
}

/// Where the run configuration comes from.
#[derive(Args)]
pub struct SourceArgs {
    /// Configuration file (default: ./config.json when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data dictionary workbook (overrides excelFile).
    #[arg(long = "excel-file", value_name = "PATH")]
    pub excel_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory for generated files (overrides outputPath).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Folder of lookup CSV files to package (overrides csvFiles).
    #[arg(long = "csv-dir", value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Survey display name (overrides surveyName).
    #[arg(long = "survey-name", value_name = "NAME")]
    pub survey_name: Option<String>,

    /// Survey identifier; names the database and the ZIP (overrides surveyId).
    #[arg(long = "survey-id", value_name = "ID")]
    pub survey_id: Option<String>,

    /// Delete the generated XML and manifest once they are packaged.
    #[arg(long = "cleanup")]
    pub cleanup: bool,
}

impl GenerateArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            excel_file: self.source.excel_file.clone(),
            csv_dir: self.csv_dir.clone(),
            output_dir: self.output_dir.clone(),
            survey_name: self.survey_name.clone(),
            survey_id: self.survey_id.clone(),
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
