#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};
use trendstats::{
    data::Value,
    frame::Table,
    schema::{ColumnMeta, ColumnType, Schema},
};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// In-memory video table: `(channel, tags, views, likes, comment_count)`.
/// `None` tags become missing cells.
pub fn video_table(rows: &[(&str, Option<&str>, i64, i64, i64)]) -> Table {
    let columns = [
        ("channel_title", ColumnType::String),
        ("title", ColumnType::String),
        ("tags", ColumnType::String),
        ("views", ColumnType::Integer),
        ("likes", ColumnType::Integer),
        ("dislikes", ColumnType::Integer),
        ("comment_count", ColumnType::Integer),
    ];
    let schema = Schema::new(
        columns
            .iter()
            .map(|(name, datatype)| ColumnMeta {
                name: name.to_string(),
                datatype: *datatype,
            })
            .collect(),
    );
    let rows = rows
        .iter()
        .enumerate()
        .map(|(idx, (channel, tags, views, likes, comments))| {
            vec![
                Some(Value::String(channel.to_string())),
                Some(Value::String(format!("video {idx}"))),
                tags.map(|t| Value::String(t.to_string())),
                Some(Value::Integer(*views)),
                Some(Value::Integer(*likes)),
                Some(Value::Integer(0)),
                Some(Value::Integer(*comments)),
            ]
        })
        .collect();
    Table::new(schema, rows).expect("video table")
}

pub fn titles(table: &Table) -> Vec<String> {
    let idx = table.column_index("title").expect("title column");
    table
        .column_values(idx)
        .map(|v| v.map(Value::as_display).unwrap_or_default())
        .collect()
}
