//! `kwtriage run`: the two-file classification pipeline

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kwtriage_core::{KeywordError, PipelineConfig, RunSummary, pipeline};

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// First keyword file (needs `Keyword` and `Traffic` columns)
    #[arg(value_name = "FIRST")]
    pub first: PathBuf,

    /// Second keyword file
    #[arg(value_name = "SECOND")]
    pub second: PathBuf,

    /// Config file (default: ./kwtriage.toml, then ~/.config/kwtriage/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Classified copy of FIRST (default: <FIRST stem>_classified.csv)
    #[arg(long, value_name = "PATH")]
    pub first_output: Option<PathBuf>,

    /// Classified copy of SECOND (default: <SECOND stem>_classified.csv)
    #[arg(long, value_name = "PATH")]
    pub second_output: Option<PathBuf>,

    /// Merged output (default: keywords_combined_classified.csv beside FIRST)
    #[arg(long, value_name = "PATH")]
    pub combined_output: Option<PathBuf>,

    /// Header of the added category column
    #[arg(long, value_name = "NAME")]
    pub category_column: Option<String>,

    /// Field delimiter (single ASCII character)
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Do not prefix outputs with a UTF-8 BOM
    #[arg(long)]
    pub no_bom: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Config file values overridden by command-line arguments
pub fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut cfg = PipelineConfig::load(args.config.as_deref())
        .context("failed to load kwtriage configuration")?;

    cfg.first_input = Some(args.first.clone());
    cfg.second_input = Some(args.second.clone());
    if let Some(path) = &args.first_output {
        cfg.first_output = Some(path.clone());
    }
    if let Some(path) = &args.second_output {
        cfg.second_output = Some(path.clone());
    }
    if let Some(path) = &args.combined_output {
        cfg.combined_output = Some(path.clone());
    }
    if let Some(column) = &args.category_column {
        cfg.category_column = column.clone();
    }
    if let Some(delimiter) = args.delimiter {
        cfg.delimiter = delimiter;
    }
    if args.no_bom {
        cfg.write_bom = false;
    }
    Ok(cfg)
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let cfg = build_config(args)?;
    let plan = cfg.resolve().context("invalid run configuration")?;
    let summary = pipeline::run(&plan).context("classification run failed")?;
    Ok(summary)
}

/// Map an error chain to the documented exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<KeywordError>())
        .map_or(1, |e| e.category().exit_code())
}

pub(crate) fn run(args: RunArgs) -> i32 {
    match run_pipeline(&args) {
        Ok(summary) => {
            if args.json {
                match summary.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: failed to serialize report: {e}");
                        return 1;
                    }
                }
            } else {
                println!("{}", summary.summary_text());
            }
            0
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code_for(&err)
        }
    }
}
