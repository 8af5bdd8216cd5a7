//! Loads a delimited file into an immutable [`Table`].
//!
//! The whole file is materialised before typing: without a declared schema
//! every value of every column takes part in type inference, so the chosen
//! type always fits. Any malformed record aborts the load.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::parse_typed_value,
    error::{AnalysisError, Result},
    frame::{Row, Table},
    io_utils,
    schema::{ColumnMeta, Schema, TypeCandidate},
};

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    /// Declared column types; inferred from the data when absent.
    pub schema: Option<Schema>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            schema: None,
        }
    }
}

/// Header plus raw decoded records with their 1-based file lines.
struct RawFile {
    headers: Vec<String>,
    records: Vec<(u64, Vec<String>)>,
}

pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let raw = read_raw(path, options)?;
    let schema = match &options.schema {
        Some(declared) => {
            declared.validate_headers(&raw.headers)?;
            declared.clone()
        }
        None => infer_from_raw(&raw),
    };

    let rows = raw
        .records
        .iter()
        .map(|(line, record)| coerce_record(&schema, *line, record))
        .collect::<Result<Vec<Row>>>()?;

    info!(
        "Loaded {} row(s) x {} column(s) from {:?}",
        rows.len(),
        schema.columns.len(),
        path
    );
    Table::new(schema, rows)
}

/// Type inference alone, as reported by `probe`. Returns non-empty counts per column.
pub fn infer_schema(path: &Path, options: &LoadOptions) -> Result<(Schema, Vec<usize>)> {
    let raw = read_raw(path, options)?;
    let candidates = observe(&raw);
    let schema = schema_from(&raw.headers, &candidates);
    let non_empty = candidates.iter().map(|c| c.non_empty).collect();
    Ok((schema, non_empty))
}

fn read_raw(path: &Path, options: &LoadOptions) -> Result<RawFile> {
    let mut reader = io_utils::open_csv_reader_from_path(path, options.delimiter)?;
    let header_record = reader.byte_headers().map_err(csv_error)?.clone();
    let headers = io_utils::decode_record(&header_record, options.encoding, 1)?;
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AnalysisError::parse(1, "missing header row"));
    }

    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(csv_error)?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(row_idx as u64 + 2);
        let decoded = io_utils::decode_record(&record, options.encoding, line)?;
        records.push((line, decoded));
    }
    debug!("Read {} raw record(s) from {:?}", records.len(), path);
    Ok(RawFile { headers, records })
}

fn observe(raw: &RawFile) -> Vec<TypeCandidate> {
    let mut candidates = vec![TypeCandidate::default(); raw.headers.len()];
    for (_, record) in &raw.records {
        for (candidate, value) in candidates.iter_mut().zip(record) {
            candidate.update(value);
        }
    }
    candidates
}

fn schema_from(headers: &[String], candidates: &[TypeCandidate]) -> Schema {
    Schema::new(
        headers
            .iter()
            .zip(candidates)
            .map(|(name, candidate)| ColumnMeta {
                name: name.clone(),
                datatype: candidate.decide(),
            })
            .collect(),
    )
}

fn infer_from_raw(raw: &RawFile) -> Schema {
    let schema = schema_from(&raw.headers, &observe(raw));
    for column in &schema.columns {
        debug!("Inferred column '{}' as {}", column.name, column.datatype);
    }
    schema
}

fn coerce_record(schema: &Schema, line: u64, record: &[String]) -> Result<Row> {
    schema
        .columns
        .iter()
        .zip(record)
        .map(|(column, raw)| {
            parse_typed_value(raw, column.datatype).map_err(|err| {
                AnalysisError::parse(line, format!("column '{}': {err}", column.name))
            })
        })
        .collect()
}

fn csv_error(err: csv::Error) -> AnalysisError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => AnalysisError::parse(
            line,
            format!("expected {expected_len} field(s), found {len}"),
        ),
        csv::ErrorKind::Io(io_err) => AnalysisError::parse(line, io_err.to_string()),
        _ => AnalysisError::parse(line, err.to_string()),
    }
}
