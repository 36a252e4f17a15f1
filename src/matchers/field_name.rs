//! Field matchers based on display name, name patterns and frame ref id.
//!
//! All name comparisons use [`display_name`], so a field renamed through
//! `config.display_name` is matched by its new name.

use crate::frame::display_name;
use crate::matchers::{
    field_matcher_id as id, parse_options, string_to_regex, FieldMatcher, FieldMatcherInfo,
    MatcherResult,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether a `byNames` list selects or deselects its names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByNamesMode {
    #[default]
    Include,
    Exclude,
}

/// Options for `byNames`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ByNamesOptions {
    pub names: Vec<String>,
    pub mode: ByNamesMode,
}

/// Options for `byRegexpOrNames`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexpOrNamesOptions {
    pub pattern: Option<String>,
    pub names: Vec<String>,
}

/// Match the field whose display name equals `name`.
pub fn name_matcher(name: String) -> FieldMatcher {
    FieldMatcher::new(move |field, frame, all| {
        field.map_or(false, |f| display_name(f, frame, all) == name)
    })
}

/// Match fields whose display name is in (or, with `Exclude`, not in) `names`.
pub fn names_matcher(options: ByNamesOptions) -> FieldMatcher {
    let names: HashSet<String> = options.names.into_iter().collect();
    let include = options.mode == ByNamesMode::Include;
    FieldMatcher::new(move |field, frame, all| match field {
        Some(f) => names.contains(&display_name(f, frame, all)) == include,
        None => false,
    })
}

/// Match fields whose display name matches `pattern` (see [`string_to_regex`]).
pub fn regex_matcher(pattern: &str) -> MatcherResult<FieldMatcher> {
    let regex = string_to_regex(pattern)?;
    Ok(regex_field_matcher(regex))
}

fn regex_field_matcher(regex: Regex) -> FieldMatcher {
    FieldMatcher::new(move |field, frame, all| {
        field.map_or(false, |f| regex.is_match(&display_name(f, frame, all)))
    })
}

fn regexp_or_names_matcher(options: RegexpOrNamesOptions) -> MatcherResult<FieldMatcher> {
    let regex = options
        .pattern
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(string_to_regex)
        .transpose()?;
    let names: HashSet<String> = options.names.into_iter().collect();
    Ok(FieldMatcher::new(move |field, frame, all| {
        let Some(field) = field else {
            return false;
        };
        let name = display_name(field, frame, all);
        names.contains(&name) || regex.as_ref().map_or(false, |re| re.is_match(&name))
    }))
}

pub(crate) fn matchers() -> Vec<FieldMatcherInfo> {
    vec![
        FieldMatcherInfo::new(id::BY_NAME, "Field Name", |options, _| {
            let name: String = parse_options(id::BY_NAME, options)?;
            Ok(name_matcher(name))
        })
        .with_description("Match a field by its display name")
        .with_display_text(|options| {
            format!("Field name: {}", options.as_str().unwrap_or_default())
        }),
        FieldMatcherInfo::new(id::BY_NAMES, "Field Names", |options, _| {
            let options: ByNamesOptions = parse_options(id::BY_NAMES, options)?;
            Ok(names_matcher(options))
        })
        .with_description("Match any of a list of display names")
        .with_default_options(serde_json::json!({ "names": [], "mode": "include" }))
        .with_display_text(|options| {
            let options: ByNamesOptions =
                serde_json::from_value(options.clone()).unwrap_or_default();
            let prefix = match options.mode {
                ByNamesMode::Include => "Field names",
                ByNamesMode::Exclude => "All except",
            };
            format!("{}: {}", prefix, options.names.join(", "))
        })
        .hidden(),
        FieldMatcherInfo::new(id::BY_REGEXP, "Field Name by Regex", |options, _| {
            let pattern: String = parse_options(id::BY_REGEXP, options)?;
            regex_matcher(&pattern)
        })
        .with_description("Match fields whose display name matches a regular expression")
        .with_default_options(serde_json::json!("/.*/"))
        .with_display_text(|options| {
            format!(
                "Field name by pattern: {}",
                options.as_str().unwrap_or_default()
            )
        }),
        FieldMatcherInfo::new(
            id::BY_REGEXP_OR_NAMES,
            "Field Name by Regex or Names",
            |options, _| {
                let options: RegexpOrNamesOptions =
                    parse_options(id::BY_REGEXP_OR_NAMES, options)?;
                regexp_or_names_matcher(options)
            },
        )
        .with_description("Match fields by a pattern or by an explicit list of names")
        .hidden(),
        FieldMatcherInfo::new(id::BY_FRAME_REF_ID, "Query refId", |options, _| {
            let ref_id: String = parse_options(id::BY_FRAME_REF_ID, options)?;
            Ok(FieldMatcher::new(move |_, frame, _| {
                frame.ref_id.as_deref() == Some(ref_id.as_str())
            }))
        })
        .with_description("Match all fields of the frame returned by a query")
        .with_display_text(|options| {
            format!("Fields returned by query: {}", options.as_str().unwrap_or_default())
        }),
    ]
}
