use log::debug;

use crate::{
    data::Value,
    error::{AnalysisError, Result},
    frame::Table,
    group::ratio,
    schema::ColumnType,
};

/// Appends `name = numerator / denominator * 100` as a `Float` column.
///
/// Rows with a zero denominator or a missing input get a missing value,
/// which ranking places last and chart series drop.
pub fn with_ratio_column(
    table: &Table,
    numerator: &str,
    denominator: &str,
    name: &str,
) -> Result<Table> {
    let num_idx = numeric_column(table, numerator)?;
    let den_idx = numeric_column(table, denominator)?;
    let mut undefined = 0usize;
    let values = (0..table.len())
        .map(|row| {
            let num = table.value(row, num_idx).and_then(Value::as_f64);
            let den = table.value(row, den_idx).and_then(Value::as_f64);
            let (Some(num), Some(den)) = (num, den) else {
                undefined += 1;
                return Ok(None);
            };
            match ratio(num, den) {
                Ok(pct) => Ok(Some(Value::Float(pct))),
                Err(AnalysisError::DivisionByZero { .. }) => {
                    undefined += 1;
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    if undefined > 0 {
        debug!("'{name}' undefined for {undefined} row(s) (zero or missing '{denominator}')");
    }
    table.with_column(name, ColumnType::Float, values)
}

fn numeric_column(table: &Table, name: &str) -> Result<usize> {
    let idx = table.column_index(name)?;
    match table.column_type(idx) {
        Some(t) if t.is_numeric() => Ok(idx),
        Some(t) => Err(AnalysisError::invalid(format!(
            "column '{name}' is {t}, expected a numeric column"
        ))),
        None => Err(AnalysisError::invalid(format!("unknown column '{name}'"))),
    }
}
