//! Load → classify → sort → write → merge
//!
//! Both sources are loaded before anything is written: a bad second file
//! aborts the run with no output on disk.

use std::path::Path;

use crate::classifier::RuleSet;
use crate::config::RunPlan;
use crate::csv_io::{load_row_set, save_row_set};
use crate::errors::Result;
use crate::report::{OutputReport, RunSummary};
use crate::row_set::RowSet;

/// Name of the combined output section in reports
pub const COMBINED_NAME: &str = "combined";

/// Drives one run over a [`RunPlan`]
pub struct Pipeline<'r> {
    rules: &'r RuleSet,
}

impl Default for Pipeline<'static> {
    fn default() -> Self {
        Self::new(RuleSet::builtin())
    }
}

impl<'r> Pipeline<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Classify every row, then sort by (rank asc, traffic desc)
    pub fn process(&self, set: &mut RowSet) {
        set.classify(self.rules);
        set.sort();
    }

    /// Execute the plan and return per-output counts
    pub fn run(&self, plan: &RunPlan) -> Result<RunSummary> {
        let mut first = load_row_set(&plan.first_input, &plan.csv)?;
        let mut second = load_row_set(&plan.second_input, &plan.csv)?;

        self.process(&mut first);
        self.process(&mut second);
        tracing::info!(
            first = first.len(),
            second = second.len(),
            "classified keywords"
        );

        save_row_set(&plan.first_output, &first, &plan.csv)?;
        save_row_set(&plan.second_output, &second, &plan.csv)?;

        let combined = RowSet::merge(COMBINED_NAME, &first, &second)?;
        save_row_set(&plan.combined_output, &combined, &plan.csv)?;

        Ok(RunSummary::new(
            report_for(&first, &plan.first_output),
            report_for(&second, &plan.second_output),
            report_for(&combined, &plan.combined_output),
        ))
    }
}

fn report_for(set: &RowSet, path: &Path) -> OutputReport {
    OutputReport::new(set.name(), path, set.histogram())
}

/// Run with the built-in rules
pub fn run(plan: &RunPlan) -> Result<RunSummary> {
    Pipeline::default().run(plan)
}
