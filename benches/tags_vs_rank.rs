use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;
use trendstats::{
    frame::Table,
    group::ChannelGroups,
    loader::{LoadOptions, load_table},
    rank::{SortKey, rank_by},
    tags::TagTokenizer,
};

fn generate_videos(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("videos.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "title,channel_title,tags,views,likes,dislikes,comment_count").expect("header");
    for i in 0..rows {
        let channel = format!("channel {}", i % 97);
        let tags = if i % 11 == 0 {
            "[none]".to_string()
        } else {
            format!("\"\"tag{}\"\"|\"\"tag{}\"\"|\"\"Tag{}\"\"", i % 13, i % 29, i % 7)
        };
        writeln!(
            file,
            "video {i},{channel},\"{tags}\",{},{},{},{}",
            1000 + i * 37 % 50_000,
            i * 13 % 9_000,
            i % 300,
            i * 7 % 4_000
        )
        .expect("row");
    }
    (temp_dir, csv_path)
}

fn load(rows: usize) -> (TempDir, Table) {
    let (dir, path) = generate_videos(rows);
    let table = load_table(&path, &LoadOptions::default()).expect("load");
    (dir, table)
}

fn bench_pipeline(c: &mut Criterion) {
    let (_dir, table) = load(50_000);
    let tokenizer = TagTokenizer::default();

    c.bench_function("tag_frequency_50k", |b| {
        b.iter(|| {
            let (frequencies, _) = tokenizer.frequency_table(&table, "tags").expect("tags");
            frequencies.most_common(15).expect("top")
        })
    });

    c.bench_function("rank_comment_count_likes_50k", |b| {
        b.iter(|| {
            rank_by(
                &table,
                &[SortKey::desc("comment_count"), SortKey::asc("likes")],
            )
            .expect("rank")
        })
    });

    c.bench_function("group_by_channel_50k", |b| {
        b.iter(|| ChannelGroups::group_by(&table, "channel_title").expect("group"))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
