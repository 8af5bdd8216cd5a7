//! Immutable, row-oriented typed table.
//!
//! Every operation that reshapes a [`Table`] returns a new one; the source
//! rows are never mutated after loading.

use crate::{
    data::{Value, display_cell},
    error::{AnalysisError, Result},
    schema::{ColumnMeta, ColumnType, Schema},
};

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table, checking every row is as wide as the schema.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        let width = schema.columns.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AnalysisError::consistency(format!(
                "row {idx} has {} cell(s) but the schema has {width} column(s)",
                row.len()
            )));
        }
        Ok(Self { schema, rows })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn headers(&self) -> Vec<String> {
        self.schema.headers()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.schema.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.schema
            .column_index(name)
            .ok_or_else(|| AnalysisError::invalid(format!("unknown column '{name}'")))
    }

    pub fn column_type(&self, column: usize) -> Option<ColumnType> {
        self.schema.columns.get(column).map(|c| c.datatype)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(Option::as_ref))
    }

    pub fn head(&self, n: usize) -> Table {
        self.slice(0, n)
    }

    pub fn tail(&self, n: usize) -> Table {
        let start = self.rows.len().saturating_sub(n);
        self.slice(start, self.rows.len())
    }

    /// Positional slice `[start, end)`, clamped to the table bounds.
    pub fn slice(&self, start: usize, end: usize) -> Table {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        Table {
            schema: self.schema.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// New table holding the given row positions in the given order.
    pub fn take(&self, indices: &[usize]) -> Result<Table> {
        let rows = indices
            .iter()
            .map(|&idx| {
                self.rows.get(idx).cloned().ok_or_else(|| {
                    AnalysisError::invalid(format!(
                        "row index {idx} out of range for {} row(s)",
                        self.rows.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            schema: self.schema.clone(),
            rows,
        })
    }

    pub fn with_column(
        &self,
        name: &str,
        datatype: ColumnType,
        values: Vec<Option<Value>>,
    ) -> Result<Table> {
        if self.schema.column_index(name).is_some() {
            return Err(AnalysisError::invalid(format!(
                "column '{name}' already exists"
            )));
        }
        if values.len() != self.rows.len() {
            return Err(AnalysisError::consistency(format!(
                "column '{name}' has {} value(s) for {} row(s)",
                values.len(),
                self.rows.len()
            )));
        }
        let mut schema = self.schema.clone();
        schema.columns.push(ColumnMeta {
            name: name.to_string(),
            datatype,
        });
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Ok(Table { schema, rows })
    }

    pub fn rename_column(&self, from: &str, to: &str) -> Result<Table> {
        let idx = self.column_index(from)?;
        if from != to && self.schema.column_index(to).is_some() {
            return Err(AnalysisError::invalid(format!(
                "column '{to}' already exists"
            )));
        }
        let mut renamed = self.clone();
        renamed.schema.columns[idx].name = to.to_string();
        Ok(renamed)
    }

    /// Display strings for every cell, for CSV or terminal output.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| display_cell(cell.as_ref())).collect())
            .collect()
    }
}
