//! Chart descriptions handed to an external renderer as JSON.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{data::Value, frame::Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub horizontal: bool,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn horizontal<L: Into<String>>(
        title: &str,
        x_label: &str,
        y_label: &str,
        pairs: impl IntoIterator<Item = (L, f64)>,
    ) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            horizontal: true,
            bars: pairs
                .into_iter()
                .map(|(label, value)| Bar {
                    label: label.into(),
                    value,
                })
                .collect(),
        }
    }

    /// Bars in reverse order, so a horizontal chart draws the largest on top.
    pub fn reversed(mut self) -> Self {
        self.bars.reverse();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub color: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color_label: String,
    pub points: Vec<Point>,
}

impl ScatterChart {
    /// Points from three numeric columns; rows missing any of them are dropped.
    pub fn from_columns(
        title: &str,
        table: &Table,
        x: usize,
        y: usize,
        color: usize,
    ) -> Self {
        let numeric = |row: usize, column: usize| table.value(row, column).and_then(Value::as_f64);
        let points = (0..table.len())
            .filter_map(|row| {
                Some(Point {
                    x: numeric(row, x)?,
                    y: numeric(row, y)?,
                    color: numeric(row, color)?,
                })
            })
            .collect();
        let header = |column: usize| {
            table
                .schema()
                .columns
                .get(column)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        };
        Self {
            title: title.to_string(),
            x_label: header(x),
            y_label: header(y),
            color_label: header(color),
            points,
        }
    }
}

pub fn write_json<T: Serialize>(chart: &T, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(chart).context("Serializing chart")?;
    fs::write(path, json).with_context(|| format!("Writing chart to {path:?}"))?;
    Ok(())
}
