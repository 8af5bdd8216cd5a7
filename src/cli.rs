use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Rank, tag, and channel analysis for YouTube trending-video CSV exports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer column types and optionally save them as a schema file
    Probe(ProbeArgs),
    /// Show the first (or last) rows and the table shape
    Preview(PreviewArgs),
    /// Sort rows by one or more columns and emit the top rows or a window
    Rank(RankArgs),
    /// Count tag frequencies across all videos
    Tags(TagsArgs),
    /// Count videos per channel, optionally with a qualifying condition
    Channels(ChannelsArgs),
    /// Add the comment/view percentage and compare like-ranked slices
    Engagement(EngagementArgs),
    /// Run the full analysis pipeline and print every section
    Report(ReportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Schema file declaring column types (inferred from the data if omitted)
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Destination schema file (YAML)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Show the last rows instead of the first
    #[arg(long)]
    pub tail: bool,
}

#[derive(Debug, Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Sort directives of the form `column[:asc|desc]`, applied left to right
    #[arg(long = "sort", required = true, action = clap::ArgAction::Append)]
    pub sort: Vec<String>,
    /// Keep only the first N ranked rows
    #[arg(long, allow_negative_numbers = true)]
    pub top: Option<i64>,
    /// First ranked row position to emit (0-based, inclusive)
    #[arg(long)]
    pub start: Option<usize>,
    /// Ranked row position to stop at (exclusive)
    #[arg(long)]
    pub end: Option<usize>,
    /// Restrict output to this comma-separated list of columns
    #[arg(short = 'C', long = "columns", value_delimiter = ',')]
    pub columns: Vec<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column holding the delimited tags
    #[arg(long, default_value = "tags")]
    pub column: String,
    /// Characters that separate tags; any run of them is one split point
    #[arg(long, default_value = "\"|")]
    pub separators: String,
    /// Field values meaning "no tags" (repeatable)
    #[arg(long = "placeholder", default_values_t = [String::from("[none]")], action = clap::ArgAction::Append)]
    pub placeholders: Vec<String>,
    /// Number of most common tags to report
    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    pub top: i64,
    /// Write a horizontal bar chart description (JSON) to this path
    #[arg(long)]
    pub chart: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ChannelsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column to group by
    #[arg(long, default_value = "channel_title")]
    pub column: String,
    /// Only consider the N rows ranked highest by `--within-key`
    #[arg(long = "within-top", allow_negative_numbers = true)]
    pub within_top: Option<i64>,
    /// Ranking column for `--within-top`
    #[arg(long = "within-key", default_value = "comment_count")]
    pub within_key: String,
    /// Condition counted per channel, e.g. `comment_count>1000`
    #[arg(long = "where")]
    pub condition: Option<String>,
    /// Number of channels to report (all when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub top: Option<i64>,
    /// Write a horizontal bar chart description (JSON) to this path
    #[arg(long)]
    pub chart: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct EngagementArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Column the slices are ranked by
    #[arg(long, default_value = "likes")]
    pub key: String,
    /// Size of the leading slice
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    pub top: i64,
    /// Start of the comparison window in the ranking
    #[arg(long = "window-start", default_value_t = 40)]
    pub window_start: usize,
    /// End (exclusive) of the comparison window in the ranking
    #[arg(long = "window-end", default_value_t = 60)]
    pub window_end: usize,
    /// Directory receiving scatter chart descriptions (JSON)
    #[arg(long = "chart-dir")]
    pub chart_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// YAML report configuration (defaults apply to omitted fields)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Directory receiving chart descriptions (JSON)
    #[arg(long = "chart-dir")]
    pub chart_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Write CSV to this file instead of printing a table (`-` for stdout CSV)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter for CSV output (defaults to comma)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
