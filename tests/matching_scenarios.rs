//! End-to-end matching tests through the public API
//!
//! Covers the documented scenarios plus property tests over random tables.

use proptest::prelude::*;
use rowmatch::{
    cross_match_json, dedup_json, deduplicate, match_across, reduce_exact, reduce_fuzzy,
    run_dedup, CellValue, CrossMatchOptions, DedupOptions, DedupRequest, ErrorKind, Record,
    SimilarityAlgorithm,
};

fn people() -> Vec<Record> {
    [
        ("John Doe", "john@e.com"),
        ("Jane", "jane@e.com"),
        ("John Doe", "john@e.com"),
        ("Bob", "bob@e.com"),
        ("Jane", "jane@e.com"),
    ]
    .into_iter()
    .map(|(name, email)| Record::new().with("Name", name).with("Email", email))
    .collect()
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// === Exact Deduplication ===

#[test]
fn test_exact_people_scenario() {
    let records = people();
    let report = deduplicate(&records, &DedupOptions::new(["Name", "Email"]).exact()).unwrap();

    assert_eq!(report.unique_count, 3);
    assert_eq!(
        report.unique_rows,
        vec![records[0].clone(), records[1].clone(), records[3].clone()]
    );
    assert_eq!(report.duplicates_found.len(), 2);
    assert_eq!(report.duplicates_found[0].original_index, 0);
    assert_eq!(report.duplicates_found[1].original_index, 1);
    assert_eq!(
        report.removed_count,
        report.original_count - report.unique_count
    );
}

#[test]
fn test_exact_column_order_changes_signature_not_result() {
    let records = people();
    let forward = deduplicate(&records, &DedupOptions::new(["Name", "Email"]).exact()).unwrap();
    let reverse = deduplicate(&records, &DedupOptions::new(["Email", "Name"]).exact()).unwrap();
    assert_eq!(forward.unique_rows, reverse.unique_rows);
    assert_ne!(
        forward.duplicates_found[0].original_signature,
        reverse.duplicates_found[0].original_signature
    );
}

// === Fuzzy Deduplication ===

#[test]
fn test_fuzzy_case_variants_merge() {
    let mut records = people();
    records.push(Record::new().with("Name", "John").with("Email", "x"));
    records.push(Record::new().with("Name", "john").with("Email", "y"));

    let options = DedupOptions::new(["Name"]).fuzzy(0.95, SimilarityAlgorithm::JaroWinkler);
    let report = deduplicate(&records, &options).unwrap();

    let merged = report
        .duplicates_found
        .iter()
        .find(|d| d.duplicate_index == 6)
        .expect("lowercase john should merge");
    assert_eq!(merged.original_index, 5);
    assert_eq!(merged.score, Some(1.0));
}

#[test]
fn test_fuzzy_non_transitive_chain() {
    // sim(A,B) >= t, sim(B,C) >= t, sim(A,C) < t under normalized Levenshtein
    let (a, b, c) = ("abcd", "abce", "abfe");
    let table = |order: &[&str]| -> Vec<Record> {
        order.iter().map(|v| Record::new().with("v", *v)).collect()
    };
    let options = DedupOptions::new(["v"]).fuzzy(0.7, SimilarityAlgorithm::Levenshtein);

    // B folds into A; C only sees A and survives
    let abc = deduplicate(&table(&[a, b, c]), &options).unwrap();
    let survivors: Vec<&CellValue> = abc.unique_rows.iter().map(|r| r.value("v")).collect();
    assert_eq!(survivors, vec![&CellValue::from(a), &CellValue::from(c)]);

    // B accepted first absorbs both
    let bac = deduplicate(&table(&[b, a, c]), &options).unwrap();
    let survivors: Vec<&CellValue> = bac.unique_rows.iter().map(|r| r.value("v")).collect();
    assert_eq!(survivors, vec![&CellValue::from(b)]);
}

// === Cross-File Matching ===

#[test]
fn test_cross_match_threshold_scenario() {
    let source = vec![Record::new().with("id", 1i64).with("v", "Smith")];
    let target = vec![Record::new().with("id", 9i64).with("v", "Smyth")];
    let options = CrossMatchOptions::new("v", "v")
        .with_algorithm(SimilarityAlgorithm::Dice)
        .with_threshold(0.5);

    let loose = match_across(&source, &target, &options).unwrap();
    assert_eq!(loose.matches.len(), 1);
    assert!(loose.matches[0].file2_row_index.is_some());
    assert!(loose.matches[0].score >= 0.5);

    let strict = match_across(&source, &target, &options.with_threshold(0.99)).unwrap();
    assert_eq!(strict.matches.len(), 1);
    assert!(strict.matches[0].file2_row_index.is_none());
    assert_eq!(strict.matches[0].score, 0.0);
}

// === JSON Boundary ===

#[test]
fn test_dedup_json_round() {
    let input = r#"{
        "records": [
            {"Name": "John Doe", "Email": "john@e.com"},
            {"Name": "Jane", "Email": "jane@e.com"},
            {"Name": "John Doe", "Email": "john@e.com"}
        ],
        "columns": ["Name", "Email"],
        "comparisonMode": "exact"
    }"#;
    let output: serde_json::Value = serde_json::from_str(&dedup_json(input).unwrap()).unwrap();
    assert_eq!(output["originalCount"], 3);
    assert_eq!(output["uniqueCount"], 2);
    assert_eq!(output["removedCount"], 1);
    assert_eq!(output["duplicatesFound"][0]["originalIndex"], 0);
    assert_eq!(output["duplicatesFound"][0]["duplicateIndex"], 2);
    assert!(output["duplicatesFound"][0].get("score").is_none());
}

#[test]
fn test_dedup_json_keeps_numbers_as_sent() {
    let input = r#"{
        "records": [
            {"id": 3, "big": 12345678901234567, "ratio": 0.5, "n": "a"},
            {"id": 4, "big": 1, "ratio": 2.0, "n": "a"}
        ],
        "columns": ["n"],
        "comparisonMode": "exact"
    }"#;
    let output = dedup_json(input).unwrap();
    assert!(output.contains(r#""id":3"#), "{}", output);
    assert!(output.contains(r#""big":12345678901234567"#), "{}", output);

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    let kept = &report["uniqueRows"][0];
    assert_eq!(kept["id"].as_u64(), Some(3));
    assert_eq!(kept["big"].as_u64(), Some(12_345_678_901_234_567));
    assert_eq!(kept["ratio"].as_f64(), Some(0.5));
}

#[test]
fn test_numeric_ids_match_as_integers() {
    // 3 and 3.0 share a signature; 17-digit IDs one apart stay distinct
    let input = r#"{
        "records": [
            {"id": 3}, {"id": 3.0},
            {"id": 12345678901234567}, {"id": 12345678901234568}
        ],
        "columns": ["id"],
        "comparisonMode": "exact"
    }"#;
    let report: serde_json::Value = serde_json::from_str(&dedup_json(input).unwrap()).unwrap();
    assert_eq!(report["uniqueCount"], 3);
    assert_eq!(report["duplicatesFound"][0]["duplicateSignature"], "3");
}

#[test]
fn test_dedup_json_jaro_winkler_tuning() {
    let request = |weight: f64| {
        format!(
            r#"{{"records": [{{"n": "Martha"}}, {{"n": "Marhta"}}], "columns": ["n"],
                "similarityThreshold": 0.95, "jaroWinkler": {{"prefixWeight": {}}}}}"#,
            weight
        )
    };
    let uniques = |weight: f64| -> serde_json::Value {
        let output = dedup_json(&request(weight)).unwrap();
        serde_json::from_str::<serde_json::Value>(&output).unwrap()["uniqueCount"].clone()
    };
    assert_eq!(uniques(0.1), 1);
    assert_eq!(uniques(0.0), 2);
}

#[test]
fn test_cross_match_json_round() {
    let input = r#"{
        "file1Records": [{"v": "Smith"}, {"v": null}],
        "file2Records": [{"v": "Smyth", "team": "red"}],
        "file1Column": "v",
        "file2Column": "v",
        "similarityThreshold": 0.5,
        "file2Passthrough": ["team"]
    }"#;
    let output: serde_json::Value =
        serde_json::from_str(&cross_match_json(input).unwrap()).unwrap();
    assert_eq!(output["totalFile1Rows"], 2);
    assert_eq!(output["matchedCount"], 1);
    assert_eq!(output["unmatchedCount"], 1);
    assert_eq!(output["matches"][0]["file2RowIndex"], 0);
    assert_eq!(output["matches"][0]["file2Data"]["team"], "red");
    assert!(output["matches"][1]["file2RowIndex"].is_null());
}

#[test]
fn test_invalid_requests_rejected() {
    let no_columns = r#"{"records": [{"a": 1}], "columns": []}"#;
    assert_eq!(
        dedup_json(no_columns).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    let bad_algorithm =
        r#"{"records": [{"a": 1}], "columns": ["a"], "similarityAlgorithm": "soundex"}"#;
    assert_eq!(
        dedup_json(bad_algorithm).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    let empty_records = DedupRequest {
        records: vec![],
        options: DedupOptions::new(["a"]),
    };
    assert_eq!(
        run_dedup(&empty_records).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}

// === Properties ===

fn table_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (
            prop::option::of("[a-cA-C]{0,3}"),
            prop::option::of("[xyz ]{0,2}"),
        ),
        1..24,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(a, b)| Record::new().with("a", a).with("b", b))
            .collect()
    })
}

proptest! {
    #[test]
    fn test_exact_keeps_first_occurrences_in_order(records in table_strategy()) {
        let columns = cols(&["a", "b"]);
        let report = deduplicate(&records, &DedupOptions::new(["a", "b"]).exact()).unwrap();
        prop_assert_eq!(report.removed_count, report.original_count - report.unique_count);

        // Every kept row's signature is new at its position
        let reduction = reduce_exact(&records, &columns);
        let mut seen = std::collections::HashSet::new();
        let mut expected = Vec::new();
        for (i, r) in records.iter().enumerate() {
            if seen.insert(rowmatch::Signature::of(r, &columns)) {
                expected.push(i);
            }
        }
        prop_assert_eq!(reduction.unique_indices, expected);
    }

    #[test]
    fn test_fuzzy_at_one_equals_exact(records in table_strategy()) {
        // Single column: no separator effects between tokens
        let columns = cols(&["a"]);
        let exact = reduce_exact(&records, &columns);
        for algo in [SimilarityAlgorithm::JaroWinkler, SimilarityAlgorithm::Levenshtein] {
            let fuzzy = reduce_fuzzy(&records, &columns, 1.0, &algo);
            prop_assert_eq!(&fuzzy.unique_indices, &exact.unique_indices);
        }
    }

    #[test]
    fn test_cross_match_one_entry_per_source_row(
        source in table_strategy(),
        target in table_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let options = CrossMatchOptions::new("a", "a").with_threshold(threshold);
        let report = match_across(&source, &target, &options).unwrap();
        prop_assert_eq!(report.matches.len(), source.len());
        prop_assert_eq!(report.matched_count + report.unmatched_count, report.total_file1_rows);
        for m in &report.matches {
            if m.file2_row_index.is_none() {
                prop_assert_eq!(m.score, 0.0);
            } else {
                prop_assert!(m.score >= threshold);
            }
        }
    }
}
