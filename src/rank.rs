//! Stable multi-key ordering and top-N extraction.

use std::cmp::Ordering;

use crate::{
    data::Value,
    error::{AnalysisError, Result},
    frame::{Row, Table},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: false,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            descending: true,
        }
    }

    /// Parses `column[:asc|desc]`; direction defaults to ascending.
    pub fn parse(spec: &str) -> Result<Self> {
        let (column, direction) = match spec.rsplit_once(':') {
            Some((column, direction)) => (column.trim(), Some(direction.trim())),
            None => (spec.trim(), None),
        };
        if column.is_empty() {
            return Err(AnalysisError::invalid("sort directive is missing a column"));
        }
        let descending = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(AnalysisError::invalid(format!(
                    "unknown sort direction '{other}'"
                )));
            }
        };
        Ok(Self {
            column: column.to_string(),
            descending,
        })
    }
}

pub fn parse_sort_keys(specs: &[String]) -> Result<Vec<SortKey>> {
    specs
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SortKey::parse)
        .collect()
}

struct SortInstruction {
    index: usize,
    descending: bool,
}

/// Orders rows by `keys`, `descending[i]` applying to `keys[i]`.
pub fn rank(table: &Table, keys: &[&str], descending: &[bool]) -> Result<Table> {
    if keys.len() != descending.len() {
        return Err(AnalysisError::invalid(format!(
            "{} sort key(s) but {} direction(s)",
            keys.len(),
            descending.len()
        )));
    }
    let keys = keys
        .iter()
        .zip(descending)
        .map(|(column, &descending)| SortKey {
            column: column.to_string(),
            descending,
        })
        .collect::<Vec<_>>();
    rank_by(table, &keys)
}

pub fn rank_by(table: &Table, keys: &[SortKey]) -> Result<Table> {
    let plan = keys
        .iter()
        .map(|key| {
            Ok(SortInstruction {
                index: table.column_index(&key.column)?,
                descending: key.descending,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut order = (0..table.len()).collect::<Vec<_>>();
    let rows = table.rows();
    // `sort_by` is stable, so rows tied on every key keep file order.
    order.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], &plan));
    table.take(&order)
}

/// First `n` rows of the stable descending ranking on `key`.
pub fn top_n(table: &Table, n: i64, key: &str) -> Result<Table> {
    let n = usize::try_from(n)
        .map_err(|_| AnalysisError::invalid(format!("top-n count must be >= 0, got {n}")))?;
    let ranked = rank_by(table, &[SortKey::desc(key)])?;
    Ok(ranked.head(n))
}

/// Rows `[start, end)` of the descending ranking on `key`.
pub fn ranked_window(table: &Table, key: &str, start: usize, end: usize) -> Result<Table> {
    if start > end {
        return Err(AnalysisError::invalid(format!(
            "window start {start} is after end {end}"
        )));
    }
    Ok(rank_by(table, &[SortKey::desc(key)])?.slice(start, end))
}

fn compare_rows(left: &Row, right: &Row, plan: &[SortInstruction]) -> Ordering {
    for instruction in plan {
        let ordering = compare_cells(
            left[instruction.index].as_ref(),
            right[instruction.index].as_ref(),
            instruction.descending,
        );
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing values sort last whatever the direction.
fn compare_cells(left: Option<&Value>, right: Option<&Value>, descending: bool) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if descending => b.cmp(a),
        (Some(a), Some(b)) => a.cmp(b),
    }
}
