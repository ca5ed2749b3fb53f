use anyhow::Result;
use tracing::info;

use gistx_cli::config::AppConfig;
use gistx_cli::pipeline::{check, generate};
use gistx_cli::types::RunOutcome;

use crate::cli::{CheckArgs, GenerateArgs};
use crate::summary::print_columns;

pub fn run_generate(args: &GenerateArgs) -> Result<RunOutcome> {
    let settings = AppConfig::load_or_default(args.source.config.as_deref())?
        .with_overrides(args.overrides())
        .into_settings(args.cleanup)?;
    info!(
        workbook = %settings.excel_file.display(),
        output_dir = %settings.output_dir.display(),
        survey_id = %settings.survey_id,
        "starting generation"
    );
    generate(&settings)
}

pub fn run_check(args: &CheckArgs) -> Result<RunOutcome> {
    let mut config = AppConfig::load_or_default(args.source.config.as_deref())?;
    if let Some(path) = &args.source.excel_file {
        config.excel_file = path.to_string_lossy().into_owned();
    }
    check(&config.excel_path()?)
}

pub fn run_columns() -> Result<()> {
    print_columns();
    Ok(())
}
