use proptest::prelude::*;
use serde_json::{json, Map, Value};
use source_profiler::profiler::{SchemaProfiler, MASK_MARKER};

const PROPTEST_CASES: u32 = 64;
const MAX_ROWS: usize = 40;

// Cell values drawn from every JSON shape, with nulls well represented
fn cell_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => Just(Value::Null),
        2 => any::<i32>().prop_map(|n| json!(n)),
        1 => any::<bool>().prop_map(|b| json!(b)),
        3 => "[a-zA-Z ]{0,20}".prop_map(Value::String),
        1 => (0..5i32).prop_map(|n| json!({"k": n})),
    ]
}

// Rows over a fixed key set; each key may be absent from a row
fn rows_strategy() -> impl Strategy<Value = Vec<Value>> {
    let keys = ["id", "name", "score", "flag"];
    prop::collection::vec(
        prop::collection::vec(prop::option::weighted(0.85, cell_strategy()), keys.len()),
        0..MAX_ROWS,
    )
    .prop_map(move |rows| {
        rows.into_iter()
            .map(|cells| {
                let mut obj = Map::new();
                for (key, cell) in keys.iter().zip(cells) {
                    if let Some(cell) = cell {
                        obj.insert(key.to_string(), cell);
                    }
                }
                Value::Object(obj)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn counts_match_input(rows in rows_strategy()) {
        let meta = SchemaProfiler::default().profile_json("http://source.test", &rows);

        prop_assert_eq!(meta.dataset.row_count, rows.len());
        let expected_columns = rows.first().and_then(Value::as_object).map_or(0, |m| m.len());
        prop_assert_eq!(meta.dataset.column_count, expected_columns);
        prop_assert_eq!(meta.columns.len(), expected_columns);
    }

    #[test]
    fn ratios_and_uniques_are_consistent(rows in rows_strategy()) {
        prop_assume!(!rows.is_empty());
        let meta = SchemaProfiler::default().profile_json("http://source.test", &rows);
        let row_count = rows.len();

        for column in &meta.columns {
            let present = rows
                .iter()
                .filter(|r| !r.get(&column.column_name).map_or(true, Value::is_null))
                .count();

            prop_assert_eq!(column.null_count + present, row_count);
            prop_assert_eq!(column.null_ratio, column.null_count as f64 / row_count as f64);
            prop_assert!(column.unique_count <= row_count - column.null_count);
            prop_assert!((0.0..=1.0).contains(&column.null_ratio));
            prop_assert!((0.0..=1.0).contains(&column.unique_ratio));
        }
    }

    #[test]
    fn samples_are_bounded_and_masked(rows in rows_strategy()) {
        let meta = SchemaProfiler::default().profile_json("http://source.test", &rows);

        for column in &meta.columns {
            prop_assert!(column.sample_values_masked.len() <= 3);

            let originals: Vec<&Value> = rows
                .iter()
                .filter_map(|r| r.get(&column.column_name))
                .filter(|v| !v.is_null())
                .take(3)
                .collect();
            prop_assert_eq!(originals.len(), column.sample_values_masked.len());

            for (original, sample) in originals.iter().zip(&column.sample_values_masked) {
                match original.as_str() {
                    Some(s) if s.chars().count() > 10 => {
                        let expected = format!("{}{}", s.chars().take(5).collect::<String>(), MASK_MARKER);
                        prop_assert_eq!(sample.as_str(), Some(expected.as_str()));
                    }
                    _ => prop_assert_eq!(sample, *original),
                }
            }
        }
    }
}

#[test]
fn empty_input_has_empty_shape() {
    let meta = SchemaProfiler::default().profile_json("http://source.test", &[]);
    let body = serde_json::to_value(&meta).unwrap();

    assert_eq!(body["dataset"]["row_count"], 0);
    assert_eq!(body["dataset"]["column_count"], 0);
    assert_eq!(body["columns"], json!([]));
    for key in ["numeric_stats", "categorical_stats", "temporal_stats", "patterns", "compliance_flags"] {
        assert_eq!(body[key], json!({}));
    }
}
