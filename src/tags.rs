//! Tag tokenization and frequency ranking.
//!
//! Exports store a video's tags as one field such as
//! `Troom Troom|"diy"|"astuces"`, or a placeholder like `[none]` when the
//! uploader set no tags. Each accepted field is lowercased and split on runs
//! of separator characters; every non-empty piece counts once per occurrence.

use std::collections::HashMap;

use log::{debug, info};
use regex::Regex;

use crate::{
    data::Value,
    error::{AnalysisError, Result},
    frame::Table,
};

pub const DEFAULT_SEPARATORS: &str = "\"|";
pub const DEFAULT_PLACEHOLDER: &str = "[none]";

#[derive(Debug, Clone)]
pub struct TagTokenizer {
    pattern: Regex,
    placeholders: Vec<String>,
}

impl Default for TagTokenizer {
    fn default() -> Self {
        Self {
            pattern: separator_pattern(DEFAULT_SEPARATORS)
                .expect("default separators should form a valid character class"),
            placeholders: vec![DEFAULT_PLACEHOLDER.to_string()],
        }
    }
}

fn separator_pattern(separators: &str) -> Result<Regex> {
    if separators.is_empty() {
        return Err(AnalysisError::invalid(
            "tag separator set must contain at least one character",
        ));
    }
    let class = separators
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<String>();
    Regex::new(&format!("[{class}]+"))
        .map_err(|err| AnalysisError::invalid(format!("tag separators '{separators}': {err}")))
}

impl TagTokenizer {
    /// `separators` are individual characters; any run of them is one split point.
    pub fn new<S: AsRef<str>>(separators: &str, placeholders: &[S]) -> Result<Self> {
        Ok(Self {
            pattern: separator_pattern(separators)?,
            placeholders: placeholders.iter().map(|p| p.as_ref().to_string()).collect(),
        })
    }

    pub fn is_placeholder(&self, raw: &str) -> bool {
        self.placeholders.iter().any(|p| p == raw)
    }

    /// False for missing fields and exact placeholder matches.
    pub fn accepts(&self, raw: Option<&str>) -> bool {
        raw.is_some_and(|value| !self.is_placeholder(value))
    }

    pub fn tokenize(&self, raw: &str) -> Vec<String> {
        let lowered = raw.to_lowercase();
        self.pattern
            .split(&lowered)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Counts every tag of `column` across the table, in row order.
    pub fn frequency_table(&self, table: &Table, column: &str) -> Result<(FrequencyTable, TagStats)> {
        let idx = table.column_index(column)?;
        let mut frequencies = FrequencyTable::default();
        let mut stats = TagStats::default();
        for (row_idx, cell) in table.column_values(idx).enumerate() {
            stats.rows_scanned += 1;
            let raw = cell.map(Value::as_display);
            if !self.accepts(raw.as_deref()) {
                match raw {
                    Some(raw) => {
                        debug!("Row {row_idx} has placeholder tags '{raw}'");
                        stats.skipped_placeholder += 1;
                    }
                    None => stats.skipped_missing += 1,
                }
                continue;
            }
            for token in raw.iter().flat_map(|raw| self.tokenize(raw)) {
                frequencies.add(&token);
                stats.tokens += 1;
            }
        }
        info!(
            "Counted {} tag occurrence(s), {} distinct, from {} row(s) ({} missing, {} placeholder)",
            stats.tokens,
            frequencies.len(),
            stats.rows_scanned,
            stats.skipped_missing,
            stats.skipped_placeholder
        );
        Ok((frequencies, stats))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagStats {
    pub rows_scanned: usize,
    pub skipped_missing: usize,
    pub skipped_placeholder: usize,
    pub tokens: usize,
}

/// Tag counts kept in first-seen order, with a lookup index by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn add(&mut self, tag: &str) {
        self.add_count(tag, 1);
    }

    pub fn add_count(&mut self, tag: &str, count: usize) {
        match self.index.get(tag) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(tag.to_string(), self.entries.len());
                self.entries.push((tag.to_string(), count));
            }
        }
    }

    pub fn get(&self, tag: &str) -> usize {
        self.index
            .get(tag)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(tag, count)| (tag.as_str(), *count))
    }

    /// The `k` most frequent tags; equal counts keep first-seen order.
    pub fn most_common(&self, k: i64) -> Result<Vec<(String, usize)>> {
        let k = usize::try_from(k)
            .map_err(|_| AnalysisError::invalid(format!("top-k count must be >= 0, got {k}")))?;
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_separated_tags_keep_duplicates() {
        let tokenizer = TagTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("funny|cute|funny"),
            vec!["funny", "cute", "funny"]
        );
    }

    #[test]
    fn quoted_separator_runs_collapse() {
        let tokenizer = TagTokenizer::default();
        assert_eq!(
            tokenizer.tokenize("\"Troom Troom\"|\"DIY\"|\"astuces\""),
            vec!["troom troom", "diy", "astuces"]
        );
    }

    #[test]
    fn separator_only_field_yields_nothing() {
        let tokenizer = TagTokenizer::default();
        assert!(tokenizer.tokenize("||").is_empty());
        assert!(tokenizer.tokenize("\"|\"").is_empty());
    }

    #[test]
    fn field_without_separator_is_one_token() {
        assert_eq!(TagTokenizer::default().tokenize("Single"), vec!["single"]);
    }

    #[test]
    fn placeholder_and_missing_are_rejected() {
        let tokenizer = TagTokenizer::default();
        assert!(!tokenizer.accepts(None));
        assert!(!tokenizer.accepts(Some("[none]")));
        assert!(tokenizer.accepts(Some("[None]")));
    }

    #[test]
    fn custom_separators_are_escaped() {
        let tokenizer = TagTokenizer::new("];", &["-"]).unwrap();
        assert_eq!(tokenizer.tokenize("a]]b;c"), vec!["a", "b", "c"]);
        assert!(tokenizer.is_placeholder("-"));
    }

    #[test]
    fn empty_separator_set_is_invalid() {
        assert!(matches!(
            TagTokenizer::new("", &[DEFAULT_PLACEHOLDER]),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn most_common_breaks_ties_by_first_seen() {
        let mut table = FrequencyTable::default();
        for tag in ["b", "a", "c", "a", "c"] {
            table.add(tag);
        }
        assert_eq!(
            table.most_common(3).unwrap(),
            vec![("a".to_string(), 2), ("c".to_string(), 2), ("b".to_string(), 1)]
        );
        assert_eq!(table.most_common(10).unwrap().len(), 3);
        assert!(table.most_common(0).unwrap().is_empty());
        assert!(table.most_common(-1).is_err());
    }
}
