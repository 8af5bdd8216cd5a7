//! Names of the video-export columns the analyses consume.
//!
//! Exports may carry other columns (`video_id`, `publish_time`, ...); only
//! the ones listed here are resolved.

use crate::{
    error::{AnalysisError, Result},
    frame::Table,
    schema::ColumnType,
};

pub const CHANNEL_TITLE: &str = "channel_title";
pub const TITLE: &str = "title";
pub const TAGS: &str = "tags";
pub const VIEWS: &str = "views";
pub const LIKES: &str = "likes";
pub const DISLIKES: &str = "dislikes";
pub const COMMENT_COUNT: &str = "comment_count";

/// Name of the comment/view percentage column added by the engagement step.
pub const VIEW_COMMENT_PERCENTAGE: &str = "VCP";

pub const NUMERIC_COLUMNS: [&str; 4] = [VIEWS, LIKES, DISLIKES, COMMENT_COUNT];

pub const TEXT_COLUMNS: [&str; 3] = [CHANNEL_TITLE, TITLE, TAGS];

/// Checks that every consumed column is present and that the counters were
/// typed as numbers.
pub fn require_video_columns(table: &Table) -> Result<()> {
    for name in TEXT_COLUMNS {
        table.column_index(name)?;
    }
    for name in NUMERIC_COLUMNS {
        let idx = table.column_index(name)?;
        let datatype = table.column_type(idx).unwrap_or(ColumnType::String);
        if !datatype.is_numeric() {
            return Err(AnalysisError::invalid(format!(
                "column '{name}' must be numeric but was loaded as {datatype}"
            )));
        }
    }
    Ok(())
}
