//! Per-category counts and the operator-facing run report

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::taxonomy::Category;

/// Row count per category, iterated in rank order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryHistogram {
    counts: BTreeMap<Category, usize>,
}

impl CategoryHistogram {
    pub fn add(&mut self, category: Category) {
        *self.counts.entry(category).or_default() += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Categories with at least one row, in rank order
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }

    /// Element-wise sum
    pub fn merged(&self, other: &CategoryHistogram) -> CategoryHistogram {
        let mut out = self.clone();
        for (category, count) in other.iter() {
            *out.counts.entry(category).or_default() += count;
        }
        out
    }
}

impl FromIterator<Category> for CategoryHistogram {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut histogram = Self::default();
        for category in iter {
            histogram.add(category);
        }
        histogram
    }
}

/// Counts for one written output
#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    /// Short name used as the section title
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub histogram: CategoryHistogram,
}

impl OutputReport {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        histogram: CategoryHistogram,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            rows: histogram.total(),
            histogram,
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub first: OutputReport,
    pub second: OutputReport,
    pub combined: OutputReport,
    /// Rows in the combined output
    pub total_keywords: usize,
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(first: OutputReport, second: OutputReport, combined: OutputReport) -> Self {
        let total_keywords = combined.rows;
        Self {
            first,
            second,
            combined,
            total_keywords,
            generated_at: Utc::now(),
        }
    }

    pub fn outputs(&self) -> [&OutputReport; 3] {
        [&self.first, &self.second, &self.combined]
    }

    /// Human-readable report
    pub fn summary_text(&self) -> String {
        let mut out = String::new();
        for output in self.outputs() {
            let _ = writeln!(out, "=== {} ===", output.name);
            for (category, count) in output.histogram.iter() {
                let _ = writeln!(out, "{category}: {count} {}", keywords_noun(count));
            }
            let _ = writeln!(out, "saved: {}", output.path.display());
            out.push('\n');
        }
        let total = self.total_keywords;
        let _ = write!(out, "Done: {total} {} processed", keywords_noun(total));
        out
    }

    /// Serialize to JSON for scripted use
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn keywords_noun(count: usize) -> &'static str {
    if count == 1 { "keyword" } else { "keywords" }
}
