//! Keyword-traffic classification
//!
//! Assigns every search keyword one category from a fixed nine-way
//! taxonomy, sorts the tables by (category rank, traffic), writes each
//! classified table plus their merge, and reports per-category counts.
//!
//! ```rust,ignore
//! use kwtriage_core::{Category, classify};
//!
//! assert_eq!(classify("怎么注册账号"), Category::Registration);
//! assert_eq!(classify("随便打个字").label(), "9.其他");
//! ```

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod classifier;
pub mod config;
pub mod csv_io;
pub mod errors;
pub mod pipeline;
pub mod report;
pub mod row_set;
pub mod taxonomy;

pub use classifier::{Classification, RULES, RuleGroup, RuleSet, classify, classify_detailed};
pub use config::{PipelineConfig, RunPlan};
pub use csv_io::{CsvOptions, load_row_set, read_row_set, save_row_set, write_row_set};
pub use errors::{ErrorCategory, KeywordError, Result};
pub use pipeline::Pipeline;
pub use report::{CategoryHistogram, OutputReport, RunSummary};
pub use row_set::{KeywordRecord, RowSet};
pub use taxonomy::Category;

/// kwtriage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
