mod common;

use common::{fixture_path, video_table};
use proptest::prelude::*;
use trendstats::{
    loader::{LoadOptions, load_table},
    tags::{FrequencyTable, TagTokenizer},
};

#[test]
fn duplicate_tags_within_a_row_all_count() {
    let table = video_table(&[("A", Some("funny|cute|funny"), 1, 1, 1)]);
    let (frequencies, stats) = TagTokenizer::default()
        .frequency_table(&table, "tags")
        .expect("tags");
    assert_eq!(frequencies.get("funny"), 2);
    assert_eq!(frequencies.get("cute"), 1);
    assert_eq!(frequencies.len(), 2);
    assert_eq!(stats.tokens, 3);
}

#[test]
fn skipped_and_empty_rows_contribute_nothing() {
    let table = video_table(&[
        ("A", Some("[none]"), 1, 1, 1),
        ("B", Some("||"), 1, 1, 1),
        ("C", None, 1, 1, 1),
        ("D", Some("Single"), 1, 1, 1),
    ]);
    let (frequencies, stats) = TagTokenizer::default()
        .frequency_table(&table, "tags")
        .expect("tags");
    assert_eq!(frequencies.iter().collect::<Vec<_>>(), vec![("single", 1)]);
    assert_eq!(stats.rows_scanned, 4);
    assert_eq!(stats.skipped_placeholder, 1);
    assert_eq!(stats.skipped_missing, 1);
    assert_eq!(stats.tokens, 1);
}

#[test]
fn fixture_tags_are_case_folded() {
    let table = load_table(&fixture_path("videos.csv"), &LoadOptions::default()).expect("load");
    let (frequencies, _) = TagTokenizer::default()
        .frequency_table(&table, "tags")
        .expect("tags");
    let top = frequencies.most_common(3).expect("most common");
    assert_eq!(
        top,
        vec![
            ("raptor".to_string(), 2),
            ("diy".to_string(), 2),
            ("astuces".to_string(), 2),
        ]
    );
    assert_eq!(frequencies.get("troom troom"), 1);
}

#[test]
fn unknown_tag_column_is_rejected() {
    let table = video_table(&[("A", Some("x"), 1, 1, 1)]);
    assert!(
        TagTokenizer::default()
            .frequency_table(&table, "keywords")
            .is_err()
    );
}

fn tag_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("[none]".to_string())),
        "[a-cA-C|\"]{0,12}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn tokenization_is_idempotent(fields in prop::collection::vec(tag_field(), 0..20)) {
        let rows = fields
            .iter()
            .map(|f| ("A", f.as_deref(), 1, 1, 1))
            .collect::<Vec<_>>();
        let table = video_table(&rows);
        let tokenizer = TagTokenizer::default();
        let (first, _) = tokenizer.frequency_table(&table, "tags").unwrap();
        let (second, _) = tokenizer.frequency_table(&table, "tags").unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn totals_match_per_row_token_counts(fields in prop::collection::vec(tag_field(), 0..20)) {
        let rows = fields
            .iter()
            .map(|f| ("A", f.as_deref(), 1, 1, 1))
            .collect::<Vec<_>>();
        let table = video_table(&rows);
        let tokenizer = TagTokenizer::default();
        let (frequencies, _) = tokenizer.frequency_table(&table, "tags").unwrap();
        let expected: usize = fields
            .iter()
            .filter(|f| tokenizer.accepts(f.as_deref()))
            .map(|f| tokenizer.tokenize(f.as_deref().unwrap_or_default()).len())
            .sum();
        prop_assert_eq!(frequencies.total(), expected);
        for (tag, _) in frequencies.iter() {
            prop_assert!(!tag.is_empty());
            prop_assert!(!tag.contains('|') && !tag.contains('"'));
        }
    }

    #[test]
    fn most_common_grows_by_prefix_extension(
        tags in prop::collection::vec("[a-e]", 0..40),
        k in 0i64..8,
    ) {
        let mut frequencies = FrequencyTable::default();
        for tag in &tags {
            frequencies.add(tag);
        }
        let smaller = frequencies.most_common(k).unwrap();
        let larger = frequencies.most_common(k + 1).unwrap();
        prop_assert!(larger.len() >= smaller.len());
        prop_assert_eq!(&larger[..smaller.len()], &smaller[..]);
    }
}
