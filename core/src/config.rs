//! Pipeline configuration
//!
//! Loaded from a TOML file (explicit path, `./kwtriage.toml`, or
//! `~/.config/kwtriage/config.toml`); every field is optional and the CLI
//! overrides whatever the file sets. Output paths default to siblings of
//! the inputs.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::csv_io::CsvOptions;
use crate::errors::{KeywordError, Result};
use crate::row_set::DEFAULT_CATEGORY_COLUMN;

/// File name searched for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "kwtriage.toml";
/// File name of the combined output when none is configured
pub const DEFAULT_COMBINED_FILE: &str = "keywords_combined_classified.csv";

/// Root configuration for one run
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub first_input: Option<PathBuf>,

    #[serde(default)]
    pub second_input: Option<PathBuf>,

    /// Defaults to `<first stem>_classified.csv` beside the first input
    #[serde(default)]
    pub first_output: Option<PathBuf>,

    #[serde(default)]
    pub second_output: Option<PathBuf>,

    /// Defaults to `keywords_combined_classified.csv` beside the first input
    #[serde(default)]
    pub combined_output: Option<PathBuf>,

    /// Header of the added category column
    #[serde(default = "default_category_column")]
    pub category_column: String,

    /// Prefix outputs with a UTF-8 BOM
    #[serde(default = "default_write_bom")]
    pub write_bom: bool,

    /// Field delimiter for inputs and outputs (single ASCII character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_category_column() -> String {
    DEFAULT_CATEGORY_COLUMN.to_string()
}

fn default_write_bom() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            first_input: None,
            second_input: None,
            first_output: None,
            second_output: None,
            combined_output: None,
            category_column: default_category_column(),
            write_bom: default_write_bom(),
            delimiter: default_delimiter(),
        }
    }
}

/// Fully resolved paths and options for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub first_input: PathBuf,
    pub second_input: PathBuf,
    pub first_output: PathBuf,
    pub second_output: PathBuf,
    pub combined_output: PathBuf,
    pub csv: CsvOptions,
}

impl PipelineConfig {
    /// Load configuration
    ///
    /// Searches in order:
    /// 1. Explicit config path (if provided; must exist)
    /// 2. ./kwtriage.toml
    /// 3. ~/.config/kwtriage/config.toml
    ///
    /// Returns defaults if no config file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".config").join("kwtriage").join("config.toml"));
        }
        for path in &candidates {
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("no kwtriage config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeywordError::config_with_source(format!("cannot read {}", path.display()), e)
        })?;
        let cfg = Self::from_toml_str(&content).map_err(|e| match e {
            KeywordError::Config { message, source } => KeywordError::Config {
                message: format!("{}: {message}", path.display()),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), "loaded kwtriage config");
        Ok(cfg)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| KeywordError::config_with_source("invalid TOML configuration", e))
    }

    /// CSV options implied by this config
    pub fn csv_options(&self) -> Result<CsvOptions> {
        if !self.delimiter.is_ascii() {
            return Err(KeywordError::config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.category_column.trim().is_empty() {
            return Err(KeywordError::config("category column name is empty"));
        }
        Ok(CsvOptions {
            delimiter: self.delimiter as u8,
            category_column: self.category_column.clone(),
            write_bom: self.write_bom,
        })
    }

    /// Resolve inputs and derive any output path left unset
    pub fn resolve(&self) -> Result<RunPlan> {
        let first_input = self
            .first_input
            .clone()
            .ok_or_else(|| KeywordError::config("first input file not set"))?;
        let second_input = self
            .second_input
            .clone()
            .ok_or_else(|| KeywordError::config("second input file not set"))?;

        let first_output = self
            .first_output
            .clone()
            .unwrap_or_else(|| classified_sibling(&first_input));
        let second_output = self
            .second_output
            .clone()
            .unwrap_or_else(|| classified_sibling(&second_input));
        let combined_output = self
            .combined_output
            .clone()
            .unwrap_or_else(|| first_input.with_file_name(DEFAULT_COMBINED_FILE));

        if first_output == second_output {
            tracing::warn!(
                path = %first_output.display(),
                "both classified outputs resolve to the same file; the second overwrites the first"
            );
        }

        Ok(RunPlan {
            first_input,
            second_input,
            first_output,
            second_output,
            combined_output,
            csv: self.csv_options()?,
        })
    }
}

/// `dir/name.csv` -> `dir/name_classified.csv`
pub fn classified_sibling(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "keywords".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_classified.csv"))
}
