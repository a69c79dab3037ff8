//! kwtriage command line
//!
//! ## Commands
//!
//! - `kwtriage run <FIRST> <SECOND>` - classify two keyword files, write the
//!   classified copies plus their merge, print per-category counts
//! - `kwtriage classify <KEYWORD>...` - classify ad-hoc keywords
//! - `kwtriage categories` - list the taxonomy
//!
//! ## Exit Codes
//! - 0: Success
//! - 1: Load error (input missing, unreadable, or malformed)
//! - 2: Save error (output not writable)
//! - 3: Configuration error

mod run_cmd;

use clap::{Parser, Subcommand};
use kwtriage_core::{Category, classify_detailed};

pub use run_cmd::{RunArgs, build_config, exit_code_for, run_pipeline};

/// Keyword-traffic classifier
#[derive(Debug, Parser)]
#[command(name = "kwtriage", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify two keyword files and write sorted, labelled copies
    ///
    /// Writes `<name>_classified.csv` next to each input and
    /// `keywords_combined_classified.csv` next to the first input unless
    /// output paths are given.
    Run(RunArgs),

    /// Classify keywords given on the command line
    Classify(ClassifyArgs),

    /// List the category taxonomy in rank order
    Categories,
}

#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Keywords to classify
    #[arg(required = true, value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Output as JSON for automation
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the selected command and return the process exit code
    pub fn run(self) -> i32 {
        match self.command {
            Command::Run(args) => run_cmd::run(args),
            Command::Classify(args) => run_classify(&args),
            Command::Categories => {
                print!("{}", categories_text());
                0
            }
        }
    }
}

fn run_classify(args: &ClassifyArgs) -> i32 {
    if args.json {
        let results: Vec<serde_json::Value> = args
            .keywords
            .iter()
            .map(|keyword| {
                let result = classify_detailed(keyword);
                serde_json::json!({
                    "keyword": keyword,
                    "category": result.category,
                    "matched_pattern": result.matched_pattern,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize results: {e}");
                return 1;
            }
        }
    } else {
        for keyword in &args.keywords {
            println!("{}", classify_line(keyword));
        }
    }
    0
}

/// `keyword<TAB>label<TAB>pattern`, with `-` when the fallback applied
pub fn classify_line(keyword: &str) -> String {
    let result = classify_detailed(keyword);
    format!(
        "{keyword}\t{}\t{}",
        result.category,
        result.matched_pattern.unwrap_or("-")
    )
}

pub fn categories_text() -> String {
    Category::ALL
        .iter()
        .map(|c| format!("{}\t{}\t{}\n", c.rank(), c.label(), c.english_name()))
        .collect()
}
