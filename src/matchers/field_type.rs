//! Field matchers based on field type and position.

use crate::frame::{Field, FieldType};
use crate::matchers::{field_matcher_id as id, parse_options, FieldMatcher, FieldMatcherInfo};

/// Match fields of type `target`. With no field supplied, always matches.
pub fn field_type_matcher(target: FieldType) -> FieldMatcher {
    FieldMatcher::for_field(true, move |field: &Field| field.field_type == target)
}

pub(crate) fn matchers() -> Vec<FieldMatcherInfo> {
    vec![
        FieldMatcherInfo::new(id::BY_TYPE, "Field Type", |options, _| {
            let target: FieldType = parse_options(id::BY_TYPE, options)?;
            Ok(field_type_matcher(target))
        })
        .with_description("Match fields by their type")
        .with_default_options(serde_json::json!(FieldType::Number))
        .with_display_text(|options| match options.as_str() {
            Some(t) => format!("Field type: {}", t),
            None => "Field type".to_string(),
        }),
        // Presets over byType, listed separately for the picker.
        FieldMatcherInfo::new(id::NUMERIC, "Numeric Fields", |_, _| {
            Ok(field_type_matcher(FieldType::Number))
        })
        .with_description("Fields with type number"),
        FieldMatcherInfo::new(id::TIME, "Time Fields", |_, _| {
            Ok(field_type_matcher(FieldType::Time))
        })
        .with_description("Fields with type time"),
        FieldMatcherInfo::new(id::FIRST, "First Field", |_, _| {
            Ok(FieldMatcher::new(|field, frame, _| match field {
                Some(field) => frame
                    .fields()
                    .first()
                    .map_or(false, |first| std::ptr::eq(first, field)),
                None => false,
            }))
        })
        .with_description("The first field in the frame")
        .hidden(),
        FieldMatcherInfo::new(id::FIRST_TIME_FIELD, "First time field", |_, _| {
            Ok(FieldMatcher::new(|field, frame, _| match field {
                Some(field) if field.field_type == FieldType::Time => frame
                    .fields()
                    .iter()
                    .find(|f| f.field_type == FieldType::Time)
                    .map_or(false, |first| std::ptr::eq(first, field)),
                _ => false,
            }))
        })
        .with_description("The first field of type time in the frame")
        .hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::DataFrame;
    use crate::matchers::{resolve, standard_field_matchers, MatcherConfig};

    fn mixed_frame() -> DataFrame {
        DataFrame::new(vec![
            Field::time("time", [1, 2]),
            Field::boolean("ok", [true, false]),
            Field::string("host", ["a", "b"]),
            Field::number("value", [1.0, 2.0]),
            Field::time("other_time", [3, 4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_by_type_matches_type() {
        let frame = mixed_frame();
        let matcher = field_type_matcher(FieldType::String);
        let matched: Vec<_> = frame
            .fields()
            .iter()
            .filter(|f| matcher.matches(f, &frame, &[]))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(matched, vec!["host"]);
    }

    #[test]
    fn test_no_field_always_matches() {
        let frame = mixed_frame();
        for t in FieldType::all() {
            assert!(field_type_matcher(*t).probe(&frame, &[]));
        }
    }

    #[test]
    fn test_presets_agree_with_by_type() {
        let registry = standard_field_matchers();
        let frame = mixed_frame();
        let cases = [
            (id::NUMERIC, FieldType::Number),
            (id::TIME, FieldType::Time),
        ];
        for (preset_id, field_type) in cases {
            let preset = resolve(&registry, &MatcherConfig::id(preset_id)).unwrap();
            let general =
                resolve(&registry, &MatcherConfig::new(id::BY_TYPE, field_type)).unwrap();
            for field in frame.fields() {
                assert_eq!(
                    preset.matches(field, &frame, &[]),
                    general.matches(field, &frame, &[]),
                    "{} disagrees with byType on {}",
                    preset_id,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_first_and_first_time_field() {
        let registry = standard_field_matchers();
        let frame = mixed_frame();
        let first = resolve(&registry, &MatcherConfig::id(id::FIRST)).unwrap();
        let first_time = resolve(&registry, &MatcherConfig::id(id::FIRST_TIME_FIELD)).unwrap();

        let fields = frame.fields();
        assert!(first.matches(&fields[0], &frame, &[]));
        assert!(!first.matches(&fields[1], &frame, &[]));
        assert!(first_time.matches(&fields[0], &frame, &[]));
        assert!(!first_time.matches(&fields[4], &frame, &[]));
    }

    #[test]
    fn test_display_text() {
        let registry = standard_field_matchers();
        let by_type = registry.get(id::BY_TYPE).unwrap();
        assert_eq!(
            by_type.options_display_text(&serde_json::json!("time")),
            "Field type: time"
        );
        let numeric = registry.get(id::NUMERIC).unwrap();
        assert_eq!(
            numeric.options_display_text(&serde_json::Value::Null),
            "Numeric Fields"
        );
    }
}
