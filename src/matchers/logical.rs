//! Logical field matchers composing other matchers.

use crate::matchers::{
    field_matcher_id as id, parse_options, resolve, FieldMatcher, FieldMatcherInfo, MatcherConfig,
    MatcherResult,
};
use crate::registry::Registry;

fn resolve_all(
    registry: &Registry<FieldMatcherInfo>,
    configs: &[MatcherConfig],
) -> MatcherResult<Vec<FieldMatcher>> {
    configs.iter().map(|c| resolve(registry, c)).collect()
}

fn list_display_text(
    joiner: &'static str,
) -> impl Fn(&serde_json::Value) -> String + Send + Sync + 'static {
    move |options| {
        let ids: Vec<String> = options
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id").and_then(|v| v.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        ids.join(joiner)
    }
}

pub(crate) fn matchers() -> Vec<FieldMatcherInfo> {
    vec![
        FieldMatcherInfo::new(id::ANY_MATCH, "Any", |options, registry| {
            let configs: Vec<MatcherConfig> = parse_options(id::ANY_MATCH, options)?;
            let children = resolve_all(registry, &configs)?;
            Ok(FieldMatcher::new(move |field, frame, all| {
                children.iter().any(|m| m.eval(field, frame, all))
            }))
        })
        .with_description("Match if any of the nested matchers match")
        .with_default_options(serde_json::json!([]))
        .with_display_text(list_display_text(" OR "))
        .hidden(),
        FieldMatcherInfo::new(id::ALL_MATCH, "All", |options, registry| {
            let configs: Vec<MatcherConfig> = parse_options(id::ALL_MATCH, options)?;
            let children = resolve_all(registry, &configs)?;
            Ok(FieldMatcher::new(move |field, frame, all| {
                children.iter().all(|m| m.eval(field, frame, all))
            }))
        })
        .with_description("Match only if every nested matcher matches")
        .with_default_options(serde_json::json!([]))
        .with_display_text(list_display_text(" AND "))
        .hidden(),
        FieldMatcherInfo::new(id::INVERT_MATCH, "Invert", |options, registry| {
            let config: MatcherConfig = parse_options(id::INVERT_MATCH, options)?;
            Ok(resolve(registry, &config)?.invert())
        })
        .with_description("Match when the nested matcher does not")
        .with_display_text(|options| {
            let inner = options.get("id").and_then(|v| v.as_str()).unwrap_or("?");
            format!("NOT {}", inner)
        })
        .hidden(),
        FieldMatcherInfo::new(id::ALWAYS_MATCH, "All Fields", |_, _| {
            Ok(FieldMatcher::new(|_, _, _| true))
        })
        .with_description("Match every field"),
        FieldMatcherInfo::new(id::NEVER_MATCH, "No Fields", |_, _| {
            Ok(FieldMatcher::new(|_, _, _| false))
        })
        .with_description("Match no field")
        .hidden(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DataFrame, Field, FieldType};
    use crate::matchers::{field_matcher_id, standard_field_matchers, MatcherError};
    use serde_json::json;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Field::time("time", [1]),
            Field::number("cpu", [1.0]),
            Field::string("host", ["a"]),
        ])
        .unwrap()
    }

    fn matched(config: MatcherConfig) -> Vec<String> {
        let registry = standard_field_matchers();
        let matcher = resolve(&registry, &config).unwrap();
        let frame = frame();
        frame
            .fields()
            .iter()
            .filter(|f| matcher.matches(f, &frame, &[]))
            .map(|f| f.name.clone())
            .collect()
    }

    #[test]
    fn test_any_match() {
        let config = MatcherConfig::new(
            id::ANY_MATCH,
            vec![
                MatcherConfig::new(field_matcher_id::BY_TYPE, FieldType::Time),
                MatcherConfig::new(field_matcher_id::BY_NAME, "host"),
            ],
        );
        assert_eq!(matched(config), vec!["time", "host"]);
    }

    #[test]
    fn test_all_match() {
        let config = MatcherConfig::new(
            id::ALL_MATCH,
            vec![
                MatcherConfig::id(field_matcher_id::NUMERIC),
                MatcherConfig::new(field_matcher_id::BY_REGEXP, "/c/"),
            ],
        );
        assert_eq!(matched(config), vec!["cpu"]);
    }

    #[test]
    fn test_invert_match() {
        let config =
            MatcherConfig::new(id::INVERT_MATCH, MatcherConfig::id(field_matcher_id::TIME));
        assert_eq!(matched(config), vec!["cpu", "host"]);
    }

    #[test]
    fn test_always_and_never() {
        assert_eq!(matched(MatcherConfig::id(id::ALWAYS_MATCH)).len(), 3);
        assert!(matched(MatcherConfig::id(id::NEVER_MATCH)).is_empty());
    }

    #[test]
    fn test_nested_unknown_id_fails() {
        let registry = standard_field_matchers();
        let config = MatcherConfig::new(id::ANY_MATCH, json!([{ "id": "missing" }]));
        assert_eq!(
            resolve(&registry, &config).unwrap_err(),
            MatcherError::UnknownMatcher("missing".to_string())
        );
    }

    #[test]
    fn test_display_text() {
        let registry = standard_field_matchers();
        let info = registry.get(id::ANY_MATCH).unwrap();
        let options = json!([{ "id": "numeric" }, { "id": "time" }]);
        assert_eq!(info.options_display_text(&options), "numeric OR time");
    }
}
