//! Column typing for loaded tables.
//!
//! A [`Schema`] is the ordered list of column names with their declared
//! [`ColumnType`]. It is either inferred from the data (every value of every
//! column is observed) or loaded from a YAML file written by `probe`.

use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    String,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::String => "String",
        };
        f.write_str(label)
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "i64" => Ok(ColumnType::Integer),
            "float" | "f64" | "double" => Ok(ColumnType::Float),
            "string" | "str" | "text" => Ok(ColumnType::String),
            other => Err(anyhow!("Unknown column type '{other}'")),
        }
    }
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub datatype: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self { columns }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading schema file {path:?}"))?;
        let schema: Schema = serde_yaml::from_str(&contents)
            .with_context(|| format!("Parsing schema file {path:?}"))?;
        Ok(schema)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self).context("Serializing schema")?;
        fs::write(path, yaml).with_context(|| format!("Writing schema file {path:?}"))?;
        Ok(())
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Declared schemas must name the file's columns in file order.
    pub fn validate_headers(&self, headers: &[String]) -> Result<()> {
        if headers.len() != self.columns.len() {
            return Err(AnalysisError::parse(
                1,
                format!(
                    "header has {} column(s) but schema declares {}",
                    headers.len(),
                    self.columns.len()
                ),
            ));
        }
        for (idx, (header, column)) in headers.iter().zip(&self.columns).enumerate() {
            if header != &column.name {
                return Err(AnalysisError::parse(
                    1,
                    format!(
                        "column {} is '{header}' but schema expects '{}'",
                        idx + 1,
                        column.name
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Running observation of one column's raw values.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeCandidate {
    pub(crate) non_empty: usize,
    integer_matches: usize,
    float_matches: usize,
}

impl TypeCandidate {
    pub(crate) fn update(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.non_empty += 1;
        let trimmed = value.trim();
        if trimmed.parse::<i64>().is_ok() {
            self.integer_matches += 1;
            self.float_matches += 1;
        } else if trimmed.parse::<f64>().is_ok() {
            self.float_matches += 1;
        }
    }

    /// Narrowest type every observed value coerces to.
    pub(crate) fn decide(&self) -> ColumnType {
        if self.non_empty == 0 {
            ColumnType::String
        } else if self.integer_matches == self.non_empty {
            ColumnType::Integer
        } else if self.float_matches == self.non_empty {
            ColumnType::Float
        } else {
            ColumnType::String
        }
    }
}
