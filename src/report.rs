//! The full analysis pipeline over one export, driven by [`ReportConfig`].
//!
//! Steps run in a fixed order over the same loaded table: popular videos and
//! the channels behind them, engagement slices, tag frequencies, and the
//! per-channel share of videos meeting a condition.

use std::{fs, path::Path};

use anyhow::Context;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    chart::{self, BarChart, ScatterChart},
    columns,
    data::display_cell,
    error::{AnalysisError, Result},
    filter::Predicate,
    frame::Table,
    group::{ChannelGroups, ChannelSummary, channel_summary},
    metrics, rank,
    render::print_table,
    tags::{DEFAULT_PLACEHOLDER, DEFAULT_SEPARATORS, TagTokenizer},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub popular_count: i64,
    pub popularity_key: String,
    pub engagement_count: i64,
    pub engagement_key: String,
    pub window_start: usize,
    pub window_end: usize,
    pub tag_column: String,
    pub tag_separators: String,
    pub tag_placeholders: Vec<String>,
    pub tag_count: i64,
    pub channel_column: String,
    pub channel_condition: String,
    pub channel_count: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            popular_count: 50,
            popularity_key: columns::COMMENT_COUNT.to_string(),
            engagement_count: 20,
            engagement_key: columns::LIKES.to_string(),
            window_start: 40,
            window_end: 60,
            tag_column: columns::TAGS.to_string(),
            tag_separators: DEFAULT_SEPARATORS.to_string(),
            tag_placeholders: vec![DEFAULT_PLACEHOLDER.to_string()],
            tag_count: 15,
            channel_column: columns::CHANNEL_TITLE.to_string(),
            channel_condition: format!("{}>1000", columns::COMMENT_COUNT),
            channel_count: 20,
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading report config {path:?}"))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).with_context(|| format!("Parsing report config {path:?}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub shape: (usize, usize),
    pub popular: Table,
    pub popular_channels: Vec<(String, usize)>,
    pub engagement_top: Table,
    pub engagement_window: Table,
    pub top_tags: Vec<(String, usize)>,
    pub channel_condition: String,
    pub channels: Vec<ChannelSummary>,
}

pub fn build_report(table: &Table, config: &ReportConfig) -> Result<Report> {
    columns::require_video_columns(table)?;

    let popular = rank::top_n(table, config.popular_count, &config.popularity_key)?;
    let popular_channels =
        ChannelGroups::group_by(&popular, &config.channel_column)?.value_counts();

    let with_vcp = metrics::with_ratio_column(
        table,
        columns::COMMENT_COUNT,
        columns::VIEWS,
        columns::VIEW_COMMENT_PERCENTAGE,
    )?;
    let engagement_top = rank::top_n(&with_vcp, config.engagement_count, &config.engagement_key)?;
    let engagement_window = rank::ranked_window(
        &with_vcp,
        &config.engagement_key,
        config.window_start,
        config.window_end,
    )?;

    let tokenizer = TagTokenizer::new(&config.tag_separators, &config.tag_placeholders)?;
    let (frequencies, _) = tokenizer.frequency_table(table, &config.tag_column)?;
    let top_tags = frequencies.most_common(config.tag_count)?;

    let groups = ChannelGroups::group_by(table, &config.channel_column)?;
    let predicate = Predicate::parse(&config.channel_condition, table)?;
    let mut channels = channel_summary(table, &groups, &predicate)?;
    let channel_count = usize::try_from(config.channel_count).map_err(|_| {
        AnalysisError::invalid(format!(
            "channel count must be >= 0, got {}",
            config.channel_count
        ))
    })?;
    channels.truncate(channel_count);

    info!(
        "Report built: {} popular video(s), {} tag(s), {} channel(s)",
        popular.len(),
        top_tags.len(),
        channels.len()
    );
    Ok(Report {
        shape: table.shape(),
        popular,
        popular_channels,
        engagement_top,
        engagement_window,
        top_tags,
        channel_condition: predicate.describe(),
        channels,
    })
}

impl Report {
    pub fn print(&self, config: &ReportConfig) -> Result<()> {
        println!("Dataset: {} row(s) x {} column(s)\n", self.shape.0, self.shape.1);

        println!(
            "Channels among the {} videos with the highest {}:",
            self.popular.len(),
            config.popularity_key
        );
        print_table(&pair_headers("channel", "videos"), &pair_rows(&self.popular_channels));

        let slice_columns = [
            columns::TITLE,
            columns::LIKES,
            columns::VIEWS,
            columns::VIEW_COMMENT_PERCENTAGE,
        ];
        println!("\nTop {} videos by {}:", self.engagement_top.len(), config.engagement_key);
        print_projection(&self.engagement_top, &slice_columns)?;
        println!(
            "\nVideos ranked {}..{} by {}:",
            config.window_start, config.window_end, config.engagement_key
        );
        print_projection(&self.engagement_window, &slice_columns)?;

        println!("\nMost common tags:");
        print_table(&pair_headers("tag", "count"), &pair_rows(&self.top_tags));

        println!("\nChannels by videos with {}:", self.channel_condition);
        print_table(&summary_headers(), &summary_rows(&self.channels));
        Ok(())
    }

    pub fn write_charts(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("Creating chart directory {dir:?}"))?;
        let counts = |pairs: &[(String, usize)]| {
            pairs
                .iter()
                .map(|(label, count)| (label.clone(), *count as f64))
                .collect::<Vec<_>>()
        };
        chart::write_json(
            &BarChart::horizontal(
                "Channels behind the most commented videos",
                "Number of videos",
                "Channel",
                counts(&self.popular_channels),
            ),
            &dir.join("popular_channels.json"),
        )?;
        chart::write_json(
            &BarChart::horizontal(
                "Most common tags",
                "Frequency",
                "Tag",
                counts(&self.top_tags),
            )
            .reversed(),
            &dir.join("tags.json"),
        )?;
        for (name, slice) in [
            ("engagement_top.json", &self.engagement_top),
            ("engagement_window.json", &self.engagement_window),
        ] {
            write_scatter(slice, &dir.join(name))?;
        }
        info!("Wrote chart descriptions to {dir:?}");
        Ok(())
    }
}

/// Likes against views, coloured by the comment/view percentage.
pub fn write_scatter(slice: &Table, path: &Path) -> anyhow::Result<()> {
    let x = slice.column_index(columns::LIKES)?;
    let y = slice.column_index(columns::VIEWS)?;
    let color = slice.column_index(columns::VIEW_COMMENT_PERCENTAGE)?;
    let scatter = ScatterChart::from_columns("Likes vs views", slice, x, y, color);
    chart::write_json(&scatter, path)
}

pub fn pair_headers(label: &str, value: &str) -> Vec<String> {
    vec![label.to_string(), value.to_string()]
}

pub fn pair_rows(pairs: &[(String, usize)]) -> Vec<Vec<String>> {
    pairs
        .iter()
        .map(|(label, count)| vec![label.clone(), count.to_string()])
        .collect()
}

pub fn summary_headers() -> Vec<String> {
    ["channel", "qualifying", "total", "percentage"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

pub fn summary_rows(summary: &[ChannelSummary]) -> Vec<Vec<String>> {
    summary
        .iter()
        .map(|row| {
            vec![
                row.channel.clone(),
                row.qualifying.to_string(),
                row.total.to_string(),
                format!("{:.2}%", row.percentage),
            ]
        })
        .collect()
}

fn print_projection(table: &Table, names: &[&str]) -> Result<()> {
    let indices = names
        .iter()
        .map(|name| table.column_index(name))
        .collect::<Result<Vec<_>>>()?;
    let headers = indices
        .iter()
        .map(|&i| table.schema().columns[i].name.clone())
        .collect::<Vec<_>>();
    let rows = (0..table.len())
        .map(|row| {
            indices
                .iter()
                .map(|&col| display_cell(table.value(row, col)))
                .collect()
        })
        .collect::<Vec<_>>();
    print_table(&headers, &rows);
    Ok(())
}
