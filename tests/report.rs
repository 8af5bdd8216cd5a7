mod common;

use common::{TestWorkspace, fixture_path, titles};
use trendstats::{
    chart::{BarChart, ScatterChart},
    columns::VIEW_COMMENT_PERCENTAGE,
    data::Value,
    error::AnalysisError,
    loader::{LoadOptions, load_table},
    report::{ReportConfig, build_report},
};

fn fixture() -> trendstats::frame::Table {
    load_table(&fixture_path("videos.csv"), &LoadOptions::default()).expect("load")
}

#[test]
fn default_report_over_fixture() {
    let table = fixture();
    let report = build_report(&table, &ReportConfig::default()).expect("report");

    assert_eq!(report.shape, (6, 10));
    assert_eq!(report.popular.len(), 6);
    assert_eq!(report.popular_channels[0], ("Le Raptor Dissident".to_string(), 2));
    assert_eq!(report.top_tags[0], ("raptor".to_string(), 2));
    assert_eq!(report.channel_condition, "comment_count > 1000");
    assert_eq!(report.channels.len(), 4);
    assert!(report.engagement_window.is_empty());

    let vcp = report
        .engagement_top
        .column_index(VIEW_COMMENT_PERCENTAGE)
        .expect("VCP column");
    let first = report.engagement_top.value(0, vcp).and_then(Value::as_f64).unwrap();
    assert!((first - 3817.0 / 212702.0 * 100.0).abs() < 1e-9);
    // zero views leave the percentage undefined
    let last = report.engagement_top.len() - 1;
    assert_eq!(report.engagement_top.value(last, vcp), None);
}

#[test]
fn config_overrides_apply() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "report.yml",
        "popular_count: 2\nengagement_count: 1\nwindow_start: 1\nwindow_end: 3\ntag_count: 1\nchannel_condition: comment_count>=2210\n",
    );
    let config = ReportConfig::load(&path).expect("config");
    assert_eq!(config.tag_placeholders, vec!["[none]".to_string()]);

    let report = build_report(&fixture(), &config).expect("report");
    assert_eq!(titles(&report.popular).len(), 2);
    assert_eq!(report.engagement_top.len(), 1);
    assert_eq!(report.engagement_window.len(), 2);
    assert_eq!(report.top_tags.len(), 1);
    assert_eq!(report.channels[0].channel, "Le Raptor Dissident");
    assert_eq!(report.channels[0].qualifying, 2);
}

#[test]
fn unknown_config_key_is_rejected() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("report.yml", "top_tags: 3\n");
    assert!(ReportConfig::load(&path).is_err());
}

#[test]
fn negative_counts_are_invalid() {
    let config = ReportConfig {
        tag_count: -1,
        ..ReportConfig::default()
    };
    assert!(matches!(
        build_report(&fixture(), &config),
        Err(AnalysisError::InvalidArgument(_))
    ));
}

#[test]
fn charts_are_written_as_json() {
    let workspace = TestWorkspace::new();
    let report = build_report(&fixture(), &ReportConfig::default()).expect("report");
    let dir = workspace.path().join("charts");
    report.write_charts(&dir).expect("charts");

    let tags: BarChart =
        serde_json::from_str(&std::fs::read_to_string(dir.join("tags.json")).unwrap()).unwrap();
    assert_eq!(tags.bars.last().map(|b| b.label.as_str()), Some("raptor"));

    let scatter: ScatterChart = serde_json::from_str(
        &std::fs::read_to_string(dir.join("engagement_top.json")).unwrap(),
    )
    .unwrap();
    // the zero-view video has no percentage and is dropped
    assert_eq!(scatter.points.len(), 5);
    assert_eq!(scatter.x_label, "likes");
    assert_eq!(scatter.color_label, VIEW_COMMENT_PERCENTAGE);
}
