//! Property tests for field filtering and matchers

mod common;

use common::field_names;
use frameflow::frame::{DataFrame, Field, FieldType, Value};
use frameflow::matchers::{resolve, MatcherConfig};
use frameflow::{transform_frames, Catalog, ErrorPolicy, TransformerConfig};
use proptest::prelude::*;
use serde_json::json;

fn field(name: String, field_type: FieldType, rows: usize) -> Field {
    let values = (0..rows)
        .map(|i| match field_type {
            FieldType::Time => Value::from(i as i64 * 1000),
            FieldType::Number => Value::Number(i as f64 * 0.5),
            FieldType::String => Value::String(format!("s{}", i)),
            FieldType::Boolean => Value::Bool(i % 2 == 0),
            FieldType::Other => Value::Null,
        })
        .collect();
    Field::new(name, field_type, values)
}

fn frame_strategy() -> impl Strategy<Value = DataFrame> {
    let field_type = prop::sample::select(vec![
        FieldType::Time,
        FieldType::Number,
        FieldType::String,
        FieldType::Boolean,
    ]);
    (
        0usize..6,
        prop::collection::vec(("[a-z]{1,3}(\\.[a-z0-9]{1,3}){0,2}", field_type), 0..8),
    )
        .prop_map(|(rows, specs)| {
            let fields = specs
                .into_iter()
                .map(|(name, field_type)| field(name, field_type, rows))
                .collect();
            DataFrame::with_length(fields, rows).unwrap()
        })
}

fn run(options: serde_json::Value, frames: Vec<DataFrame>) -> Vec<DataFrame> {
    let configs = [TransformerConfig::new("filterFields", options)];
    transform_frames(&configs, frames, &Catalog::standard(), ErrorPolicy::Fail)
        .unwrap()
        .frames
}

proptest! {
    #[test]
    fn prop_include_numeric_is_idempotent(frames in prop::collection::vec(frame_strategy(), 1..4)) {
        let options = json!({ "include": { "id": "numeric" } });
        let once = run(options.clone(), frames);
        let twice = run(options, once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_include_numeric_keeps_order_and_length(frame in frame_strategy()) {
        let out = run(json!({ "include": { "id": "numeric" } }), vec![frame.clone()]);
        let expected: Vec<String> = frame
            .fields()
            .iter()
            .filter(|f| f.field_type == FieldType::Number)
            .map(|f| f.name.clone())
            .collect();
        prop_assert_eq!(field_names(&out[0]), expected);
        prop_assert_eq!(out.len(), 1);
    }

    #[test]
    fn prop_include_and_exclude_partition_fields(
        frame in frame_strategy(),
        pattern in prop::sample::select(vec!["/^[a-m]/", "/\\./", "/.*/", "/^x$/"]),
    ) {
        let matcher = json!({ "id": "byRegexp", "options": pattern });
        let included = run(json!({ "include": matcher }), vec![frame.clone()]);
        let excluded = run(json!({ "exclude": matcher }), vec![frame.clone()]);

        let mut recombined = field_names(&included[0]);
        recombined.extend(field_names(&excluded[0]));
        recombined.sort();
        let mut original = field_names(&frame);
        original.sort();
        prop_assert_eq!(recombined, original);
    }

    #[test]
    fn prop_type_matchers_match_when_no_field(frame in frame_strategy()) {
        let catalog = Catalog::standard();
        for id in ["numeric", "time"] {
            let matcher = resolve(&catalog.field_matchers, &MatcherConfig::id(id)).unwrap();
            prop_assert!(matcher.probe(&frame, &[]));
        }
        for field_type in FieldType::all() {
            let matcher = resolve(
                &catalog.field_matchers,
                &MatcherConfig::new("byType", field_type),
            )
            .unwrap();
            prop_assert!(matcher.probe(&frame, &[]));
        }
    }

    #[test]
    fn prop_catch_all_pattern_matches_every_name(frame in frame_strategy()) {
        let catalog = Catalog::standard();
        let matcher = resolve(
            &catalog.field_matchers,
            &MatcherConfig::new("byRegexp", "/.*/"),
        )
        .unwrap();
        let all = [frame.clone()];
        for f in frame.fields() {
            prop_assert!(matcher.matches(f, &frame, &all));
        }
    }
}
