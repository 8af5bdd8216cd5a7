//! Partitioning rows by a categorical column and per-group aggregates.
//!
//! Groups are materialised eagerly as owned lists of row positions into the
//! source table, in first-appearance order of each key.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    data::Value,
    error::{AnalysisError, Result},
    filter::Predicate,
    frame::Table,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGroups {
    column: String,
    groups: Vec<Group>,
    index: HashMap<String, usize>,
}

impl ChannelGroups {
    /// Missing keys group under the empty string so no row is lost.
    pub fn group_by(table: &Table, key: &str) -> Result<Self> {
        let column = table.column_index(key)?;
        let mut groups: Vec<Group> = Vec::new();
        let mut index = HashMap::new();
        for (row, cell) in table.column_values(column).enumerate() {
            let label = cell.map(Value::as_display).unwrap_or_default();
            let slot = *index.entry(label.clone()).or_insert_with(|| {
                groups.push(Group {
                    key: label,
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].rows.push(row);
        }
        debug!("Grouped {} row(s) into {} group(s) by '{key}'", table.len(), groups.len());
        Ok(Self {
            column: key.to_string(),
            groups,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.index.get(key).map(|&slot| &self.groups[slot])
    }

    fn require(&self, key: &str) -> Result<&Group> {
        self.get(key).ok_or_else(|| {
            AnalysisError::invalid(format!("no group '{key}' in column '{}'", self.column))
        })
    }

    pub fn count(&self, key: &str) -> Result<usize> {
        Ok(self.require(key)?.rows.len())
    }

    /// Rows of group `key` whose `column` value satisfies `predicate`.
    /// Missing values never satisfy it.
    pub fn conditional_count<F>(
        &self,
        table: &Table,
        key: &str,
        column: &str,
        predicate: F,
    ) -> Result<usize>
    where
        F: Fn(&Value) -> bool,
    {
        let column = table.column_index(column)?;
        let group = self.require(key)?;
        Ok(group
            .rows
            .iter()
            .filter(|&&row| table.value(row, column).is_some_and(&predicate))
            .count())
    }

    /// Group sizes in first-appearance order.
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| (g.key.clone(), g.rows.len()))
            .collect()
    }

    /// Group sizes, largest first; equal sizes keep first-appearance order.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let mut counts = self.counts();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

/// `numerator / denominator` as a percentage.
pub fn ratio(numerator: f64, denominator: f64) -> Result<f64> {
    if denominator == 0.0 {
        return Err(AnalysisError::DivisionByZero { numerator });
    }
    Ok(numerator / denominator * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub channel: String,
    pub qualifying: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Per-group qualifying count, total, and qualifying percentage.
///
/// The qualifying and total series are computed separately and joined on
/// the group key; a key missing from either side is a consistency error.
/// Rows come back ordered by qualifying count, largest first.
pub fn channel_summary(
    table: &Table,
    groups: &ChannelGroups,
    predicate: &Predicate,
) -> Result<Vec<ChannelSummary>> {
    let qualifying = groups
        .keys()
        .map(|key| {
            let count = groups.conditional_count(table, key, &predicate.column, |v| {
                predicate.matches(v)
            })?;
            Ok((key.to_string(), count))
        })
        .collect::<Result<Vec<_>>>()?;
    let totals = groups.counts();
    let mut summary = join_counts(&qualifying, &totals)?;
    summary.sort_by(|a, b| b.qualifying.cmp(&a.qualifying));
    Ok(summary)
}

/// Joins two keyed count series; both must carry exactly the same keys.
pub fn join_counts(
    qualifying: &[(String, usize)],
    totals: &[(String, usize)],
) -> Result<Vec<ChannelSummary>> {
    let total_by_key = totals
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect::<HashMap<_, _>>();
    let qualifying_keys = qualifying
        .iter()
        .map(|(key, _)| key.as_str())
        .collect::<HashSet<_>>();
    if let Some((missing, _)) = totals
        .iter()
        .find(|(key, _)| !qualifying_keys.contains(key.as_str()))
    {
        return Err(AnalysisError::consistency(format!(
            "group '{missing}' has a total but no qualifying count"
        )));
    }
    qualifying
        .iter()
        .map(|(key, count)| {
            let total = *total_by_key.get(key.as_str()).ok_or_else(|| {
                AnalysisError::consistency(format!(
                    "group '{key}' has a qualifying count but no total"
                ))
            })?;
            Ok(ChannelSummary {
                channel: key.clone(),
                qualifying: *count,
                total,
                percentage: ratio(*count as f64, total as f64)?,
            })
        })
        .collect()
}
