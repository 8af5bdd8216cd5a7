pub mod chart;
pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod filter;
pub mod frame;
pub mod group;
pub mod io_utils;
pub mod loader;
pub mod metrics;
pub mod rank;
pub mod render;
pub mod report;
pub mod schema;
pub mod tags;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{
        ChannelsArgs, Cli, Commands, EngagementArgs, InputArgs, OutputArgs, PreviewArgs,
        ProbeArgs, RankArgs, ReportArgs, TagsArgs,
    },
    frame::Table,
    group::ChannelGroups,
    loader::LoadOptions,
    report::{ReportConfig, pair_headers, pair_rows, summary_headers, summary_rows},
    schema::Schema,
    tags::TagTokenizer,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("trendstats", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Rank(args) => handle_rank(&args),
        Commands::Tags(args) => handle_tags(&args),
        Commands::Channels(args) => handle_channels(&args),
        Commands::Engagement(args) => handle_engagement(&args),
        Commands::Report(args) => handle_report(&args),
    }
}

fn load_options(args: &InputArgs) -> Result<LoadOptions> {
    let schema = match &args.schema {
        Some(path) => {
            Some(Schema::load(path).with_context(|| format!("Loading schema from {path:?}"))?)
        }
        None => None,
    };
    Ok(LoadOptions {
        delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        schema,
    })
}

fn load_input(args: &InputArgs) -> Result<Table> {
    let options = load_options(args)?;
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(options.delimiter)
    );
    let table = loader::load_table(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    Ok(table)
}

/// Prints a table to stdout, or writes CSV when an output path is given.
fn emit(output: &OutputArgs, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    match &output.output {
        Some(path) => {
            let delimiter = output
                .output_delimiter
                .unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
            io_utils::write_csv(Some(path), delimiter, headers, rows)?;
            if !io_utils::is_dash(path) {
                info!("Wrote {} row(s) to {:?}", rows.len(), path);
            }
        }
        None => render::print_table(headers, rows),
    }
    Ok(())
}

fn handle_probe(args: &ProbeArgs) -> Result<()> {
    let options = load_options(&args.input)?;
    info!(
        "Probing '{}' with delimiter '{}'",
        args.input.input.display(),
        printable_delimiter(options.delimiter)
    );
    let (schema, non_empty) = loader::infer_schema(&args.input.input, &options)
        .with_context(|| format!("Inferring schema from {:?}", args.input.input))?;
    let rows = schema
        .columns
        .iter()
        .zip(&non_empty)
        .enumerate()
        .map(|(idx, (column, count))| {
            vec![
                (idx + 1).to_string(),
                column.name.clone(),
                column.datatype.to_string(),
                count.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "name", "type", "non-empty"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    if let Some(path) = &args.output {
        schema
            .save(path)
            .with_context(|| format!("Writing schema to {path:?}"))?;
        info!(
            "Inferred schema for {} column(s) written to {:?}",
            schema.columns.len(),
            path
        );
    }
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let table = load_input(&args.input)?;
    let slice = if args.tail {
        table.tail(args.rows)
    } else {
        table.head(args.rows)
    };
    render::print_table(&slice.headers(), &slice.display_rows());
    let (rows, columns) = table.shape();
    println!("({rows} rows x {columns} columns)");
    Ok(())
}

fn handle_rank(args: &RankArgs) -> Result<()> {
    let table = load_input(&args.input)?;
    let keys = rank::parse_sort_keys(&args.sort)?;
    debug!("Sort keys: {:?}", keys);
    let mut ranked = rank::rank_by(&table, &keys)?;
    if args.start.is_some() || args.end.is_some() {
        let start = args.start.unwrap_or(0);
        let end = args.end.unwrap_or(ranked.len());
        if start > end {
            anyhow::bail!("--start {start} is after --end {end}");
        }
        ranked = ranked.slice(start, end);
    }
    if let Some(top) = args.top {
        let top = usize::try_from(top)
            .map_err(|_| error::AnalysisError::invalid(format!("--top must be >= 0, got {top}")))?;
        ranked = ranked.head(top);
    }

    let (headers, rows) = if args.columns.is_empty() {
        (ranked.headers(), ranked.display_rows())
    } else {
        let indices = args
            .columns
            .iter()
            .map(|name| ranked.column_index(name.trim()))
            .collect::<error::Result<Vec<_>>>()?;
        let all_rows = ranked.display_rows();
        let headers = indices.iter().map(|&i| ranked.headers()[i].clone()).collect();
        let rows = all_rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        (headers, rows)
    };
    emit(&args.output, &headers, &rows)?;
    info!("Ranked {} row(s) by {} key(s)", rows.len(), keys.len());
    Ok(())
}

fn handle_tags(args: &TagsArgs) -> Result<()> {
    let table = load_input(&args.input)?;
    let tokenizer = TagTokenizer::new(&args.separators, &args.placeholders)?;
    let (frequencies, _stats) = tokenizer.frequency_table(&table, &args.column)?;
    let top = frequencies.most_common(args.top)?;
    emit(&args.output, &pair_headers("tag", "count"), &pair_rows(&top))?;
    if let Some(path) = &args.chart {
        let bars = top.iter().map(|(tag, count)| (tag.clone(), *count as f64));
        let chart = chart::BarChart::horizontal(
            "Analysing the popularity of tagging words",
            "Frequency of the tagging words",
            "Most common tagging words",
            bars,
        )
        .reversed();
        chart::write_json(&chart, path)?;
    }
    Ok(())
}

fn handle_channels(args: &ChannelsArgs) -> Result<()> {
    let mut table = load_input(&args.input)?;
    if let Some(n) = args.within_top {
        table = rank::top_n(&table, n, &args.within_key)?;
        info!("Restricted to the top {} row(s) by '{}'", table.len(), args.within_key);
    }
    let groups = ChannelGroups::group_by(&table, &args.column)?;
    let limit = args
        .top
        .map(|n| {
            usize::try_from(n)
                .map_err(|_| error::AnalysisError::invalid(format!("--top must be >= 0, got {n}")))
        })
        .transpose()?;

    let bars: Vec<(String, f64)> = match &args.condition {
        Some(condition) => {
            let predicate = filter::Predicate::parse(condition, &table)?;
            let mut summary = group::channel_summary(&table, &groups, &predicate)?;
            if let Some(limit) = limit {
                summary.truncate(limit);
            }
            emit(&args.output, &summary_headers(), &summary_rows(&summary))?;
            summary
                .iter()
                .map(|row| (row.channel.clone(), row.percentage))
                .collect()
        }
        None => {
            let mut counts = groups.value_counts();
            if let Some(limit) = limit {
                counts.truncate(limit);
            }
            emit(&args.output, &pair_headers(&args.column, "videos"), &pair_rows(&counts))?;
            counts
                .iter()
                .map(|(channel, count)| (channel.clone(), *count as f64))
                .collect()
        }
    };
    info!("Grouped {} row(s) into {} channel(s)", table.len(), groups.len());

    if let Some(path) = &args.chart {
        let x_label = if args.condition.is_some() {
            "Percentage of qualifying videos"
        } else {
            "Number of videos"
        };
        let chart = chart::BarChart::horizontal("Videos per channel", x_label, "Channel", bars);
        chart::write_json(&chart, path)?;
    }
    Ok(())
}

fn handle_engagement(args: &EngagementArgs) -> Result<()> {
    let table = load_input(&args.input)?;
    columns::require_video_columns(&table)?;
    let with_vcp = metrics::with_ratio_column(
        &table,
        columns::COMMENT_COUNT,
        columns::VIEWS,
        columns::VIEW_COMMENT_PERCENTAGE,
    )?;
    let leading = rank::top_n(&with_vcp, args.top, &args.key)?;
    let window = rank::ranked_window(&with_vcp, &args.key, args.window_start, args.window_end)?;

    for (caption, slice) in [
        (format!("Top {} by {}", leading.len(), args.key), &leading),
        (
            format!("Ranked {}..{} by {}", args.window_start, args.window_end, args.key),
            &window,
        ),
    ] {
        println!("{caption}:");
        print_engagement(slice)?;
        println!();
    }

    if let Some(dir) = &args.chart_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {dir:?}"))?;
        report::write_scatter(&leading, &dir.join("engagement_top.json"))?;
        report::write_scatter(&window, &dir.join("engagement_window.json"))?;
        info!("Wrote scatter chart descriptions to {dir:?}");
    }
    Ok(())
}

fn print_engagement(slice: &Table) -> Result<()> {
    let names = [
        columns::TITLE,
        columns::CHANNEL_TITLE,
        columns::LIKES,
        columns::VIEWS,
        columns::COMMENT_COUNT,
        columns::VIEW_COMMENT_PERCENTAGE,
    ];
    let indices = names
        .iter()
        .map(|name| slice.column_index(name))
        .collect::<error::Result<Vec<_>>>()?;
    let rows = (0..slice.len())
        .map(|row| {
            indices
                .iter()
                .map(|&col| data::display_cell(slice.value(row, col)))
                .collect()
        })
        .collect::<Vec<_>>();
    let headers = names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
    render::print_table(&headers, &rows);
    Ok(())
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    debug!("Report config: {:?}", config);
    let table = load_input(&args.input)?;
    let report = report::build_report(&table, &config)?;
    report.print(&config)?;
    if let Some(dir) = &args.chart_dir {
        report.write_charts(dir)?;
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
