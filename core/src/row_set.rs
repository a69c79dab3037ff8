//! In-memory keyword tables
//!
//! A [`RowSet`] keeps every column of the source file untouched. Only the
//! `Keyword` and `Traffic` columns are interpreted; the category is held
//! beside each row and materialized as a column when the set is written.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::classifier::RuleSet;
use crate::errors::{KeywordError, Result};
use crate::report::CategoryHistogram;
use crate::taxonomy::Category;

/// Header of the keyword text column
pub const KEYWORD_COLUMN: &str = "Keyword";
/// Header of the traffic column
pub const TRAFFIC_COLUMN: &str = "Traffic";
/// Default header of the category column added on output
pub const DEFAULT_CATEGORY_COLUMN: &str = "关键词分类";

/// One data row
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    /// All source fields, in header order
    pub fields: Vec<String>,
    /// Parsed `Traffic`; `None` when the cell was empty
    pub traffic: Option<f64>,
    pub category: Option<Category>,
}

/// A table loaded from one source
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    name: String,
    headers: Vec<String>,
    keyword_idx: usize,
    traffic_idx: usize,
    category_column: String,
    /// Position of an existing category column, if the source already had one
    category_idx: Option<usize>,
    rows: Vec<KeywordRecord>,
}

impl RowSet {
    /// Build an empty set from a header row. Fails when `Keyword` or
    /// `Traffic` is absent.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        category_column: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let category_column = category_column.into();
        let position = |column: &str| headers.iter().position(|h| h == column);

        let keyword_idx = position(KEYWORD_COLUMN).ok_or_else(|| {
            KeywordError::load(format!("{name}: missing required column `{KEYWORD_COLUMN}`"))
        })?;
        let traffic_idx = position(TRAFFIC_COLUMN).ok_or_else(|| {
            KeywordError::load(format!("{name}: missing required column `{TRAFFIC_COLUMN}`"))
        })?;
        let category_idx = position(&category_column);

        Ok(Self {
            name,
            headers,
            keyword_idx,
            traffic_idx,
            category_column,
            category_idx,
            rows: Vec::new(),
        })
    }

    /// Append a row of raw fields. `line` is used only for error messages.
    pub fn push_fields(&mut self, fields: Vec<String>, line: u64) -> Result<()> {
        if fields.len() != self.headers.len() {
            return Err(KeywordError::load(format!(
                "{}: line {line} has {} fields, header has {}",
                self.name,
                fields.len(),
                self.headers.len()
            )));
        }
        let traffic = parse_traffic(&fields[self.traffic_idx]).ok_or_else(|| {
            KeywordError::load(format!(
                "{}: line {line}: `{TRAFFIC_COLUMN}` value `{}` is not numeric",
                self.name, fields[self.traffic_idx]
            ))
        })?;
        self.rows.push(KeywordRecord {
            fields,
            traffic,
            category: None,
        });
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn category_column(&self) -> &str {
        &self.category_column
    }

    /// Whether the source already carried a category column
    pub fn has_category_column(&self) -> bool {
        self.category_idx.is_some()
    }

    pub fn rows(&self) -> &[KeywordRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keyword<'a>(&self, row: &'a KeywordRecord) -> &'a str {
        &row.fields[self.keyword_idx]
    }

    /// Header row as written on output
    pub fn output_headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.headers.iter().map(String::as_str).collect();
        if self.category_idx.is_none() {
            headers.push(&self.category_column);
        }
        headers
    }

    /// One row as written on output; an unclassified row has an empty label
    pub fn output_fields<'a>(&self, row: &'a KeywordRecord) -> Vec<&'a str> {
        let label = row.category.map_or("", |c| c.label());
        let mut fields: Vec<&str> = row.fields.iter().map(String::as_str).collect();
        match self.category_idx {
            Some(idx) => fields[idx] = label,
            None => fields.push(label),
        }
        fields
    }

    /// Assign a category to every row
    pub fn classify(&mut self, rules: &RuleSet) {
        let keyword_idx = self.keyword_idx;
        for row in &mut self.rows {
            let keyword = &row.fields[keyword_idx];
            let result = rules.classify_detailed(keyword);
            tracing::debug!(
                keyword = %keyword,
                category = %result.category,
                pattern = result.matched_pattern.unwrap_or("-"),
                "classified keyword"
            );
            row.category = Some(result.category);
        }
    }

    /// Stable sort by category rank ascending, then traffic descending.
    /// Rows without traffic go last within their category; unclassified
    /// rows go after every category.
    pub fn sort(&mut self) {
        self.rows.sort_by(compare_rows);
    }

    /// Per-category row counts
    pub fn histogram(&self) -> CategoryHistogram {
        self.rows.iter().filter_map(|r| r.category).collect()
    }

    /// Concatenate `first` then `second` and sort the result. Columns are
    /// matched by header name, and a repeated name by its occurrence
    /// (the second `Tag` pairs with the second `Tag`). Columns only `second`
    /// has are appended and cells missing on either side are left empty.
    pub fn merge(name: impl Into<String>, first: &RowSet, second: &RowSet) -> Result<RowSet> {
        let mut keys = column_keys(&first.headers);
        let second_keys = column_keys(&second.headers);
        for key in &second_keys {
            if !keys.contains(key) {
                keys.push(*key);
            }
        }
        let headers: Vec<String> = keys.iter().map(|(h, _)| (*h).to_string()).collect();
        if first.category_column != second.category_column {
            tracing::warn!(
                first = %first.category_column,
                second = %second.category_column,
                "merging row sets with different category columns; keeping the first"
            );
        }

        let mut merged = RowSet::new(name, headers, first.category_column.clone())?;
        let width = merged.headers.len();

        for row in &first.rows {
            let mut fields = row.fields.clone();
            fields.resize(width, String::new());
            merged.rows.push(KeywordRecord {
                fields,
                traffic: row.traffic,
                category: row.category,
            });
        }

        let mapping: Vec<Option<usize>> = keys
            .iter()
            .map(|key| second_keys.iter().position(|k| k == key))
            .collect();
        for row in &second.rows {
            let fields = mapping
                .iter()
                .map(|idx| idx.map(|i| row.fields[i].clone()).unwrap_or_default())
                .collect();
            merged.rows.push(KeywordRecord {
                fields,
                traffic: row.traffic,
                category: row.category,
            });
        }

        merged.sort();
        Ok(merged)
    }
}

/// Each header paired with how many earlier headers share its name
fn column_keys(headers: &[String]) -> Vec<(&str, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .map(|header| {
            let count = seen.entry(header.as_str()).or_default();
            let key = (header.as_str(), *count);
            *count += 1;
            key
        })
        .collect()
}

/// `Some(None)` for an empty cell, `None` when the value is not a number.
fn parse_traffic(raw: &str) -> Option<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_nan() => Some(None),
        Ok(value) => Some(Some(value)),
        Err(_) => None,
    }
}

fn compare_rows(a: &KeywordRecord, b: &KeywordRecord) -> Ordering {
    let rank = |r: &KeywordRecord| r.category.map_or(u8::MAX, |c| c.rank());
    rank(a)
        .cmp(&rank(b))
        .then_with(|| match (a.traffic, b.traffic) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
