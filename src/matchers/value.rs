//! Value matchers: predicates over a single cell, used for row filtering.

use crate::frame::Value;
use crate::matchers::{
    parse_options, value_matcher_id as id, MatcherError, ValueMatcher, ValueMatcherInfo,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Options for the comparison matchers (`greater`, `lower`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericValueOptions {
    pub value: f64,
}

/// Options for `equal` / `notEqual`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicValueOptions {
    #[serde(default)]
    pub value: Value,
}

/// Options for `between`. Both bounds are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeValueOptions {
    pub from: f64,
    pub to: f64,
}

/// Options for `regex`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegexValueOptions {
    pub value: String,
}

/// Equality used by `equal`: numbers compare numerically (so `"5"` equals
/// `5`), everything else by its text form. Null only equals null.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.to_string() == b.to_string(),
        },
    }
}

fn comparison<F>(
    matcher_id: &'static str,
    name: &'static str,
    op: &'static str,
    cmp: F,
) -> ValueMatcherInfo
where
    F: Fn(f64, f64) -> bool + Copy + Send + Sync + 'static,
{
    ValueMatcherInfo::new(matcher_id, name, move |options, _| {
        let options: NumericValueOptions = parse_options(matcher_id, options)?;
        let threshold = options.value;
        Ok(ValueMatcher::new(move |value, _| {
            value
                .as_f64()
                .filter(|v| !v.is_nan())
                .map_or(false, |v| cmp(v, threshold))
        }))
    })
    .with_description(format!("Match when value {} threshold", op))
    .with_default_options(serde_json::json!({ "value": 0 }))
    .with_display_text(move |options| {
        let value = options.get("value").map(|v| v.to_string()).unwrap_or_default();
        format!("Value {} {}", op, value)
    })
}

pub(crate) fn matchers() -> Vec<ValueMatcherInfo> {
    vec![
        ValueMatcherInfo::new(id::IS_NULL, "Is null", |_, _| {
            Ok(ValueMatcher::new(|value, _| value.is_null()))
        })
        .with_description("Match when the value is null"),
        ValueMatcherInfo::new(id::IS_NOT_NULL, "Is not null", |_, _| {
            Ok(ValueMatcher::new(|value, _| !value.is_null()))
        })
        .with_description("Match when the value is not null"),
        comparison(id::GREATER, "Greater than", ">", |v, t| v > t),
        comparison(id::GREATER_OR_EQUAL, "Greater or equal", ">=", |v, t| v >= t),
        comparison(id::LOWER, "Lower than", "<", |v, t| v < t),
        comparison(id::LOWER_OR_EQUAL, "Lower or equal", "<=", |v, t| v <= t),
        ValueMatcherInfo::new(id::EQUAL, "Is equal", |options, _| {
            let options: BasicValueOptions = parse_options(id::EQUAL, options)?;
            Ok(ValueMatcher::new(move |value, _| {
                loosely_equal(value, &options.value)
            }))
        })
        .with_description("Match when the value equals the configured value")
        .with_display_text(|options| {
            let value = options.get("value").map(|v| v.to_string()).unwrap_or_default();
            format!("Value == {}", value)
        }),
        ValueMatcherInfo::new(id::NOT_EQUAL, "Is not equal", |options, _| {
            let options: BasicValueOptions = parse_options(id::NOT_EQUAL, options)?;
            Ok(ValueMatcher::new(move |value, _| {
                !loosely_equal(value, &options.value)
            }))
        })
        .with_description("Match when the value differs from the configured value")
        .with_display_text(|options| {
            let value = options.get("value").map(|v| v.to_string()).unwrap_or_default();
            format!("Value != {}", value)
        }),
        ValueMatcherInfo::new(id::BETWEEN, "Is between", |options, _| {
            let RangeValueOptions { from, to } = parse_options(id::BETWEEN, options)?;
            Ok(ValueMatcher::new(move |value, _| {
                value.as_f64().map_or(false, |v| v > from && v < to)
            }))
        })
        .with_description("Match when the value lies strictly between two bounds")
        .with_default_options(serde_json::json!({ "from": 0, "to": 100 }))
        .with_display_text(|options| {
            let bound = |key: &str| options.get(key).map(|v| v.to_string()).unwrap_or_default();
            format!("Value between {} and {}", bound("from"), bound("to"))
        }),
        ValueMatcherInfo::new(id::REGEX, "Regex", |options, _| {
            let options: RegexValueOptions = parse_options(id::REGEX, options)?;
            let regex = Regex::new(&options.value).map_err(|e| MatcherError::InvalidPattern {
                pattern: options.value.clone(),
                message: e.to_string(),
            })?;
            Ok(ValueMatcher::new(move |value, _| {
                !value.is_null() && regex.is_match(&value.to_string())
            }))
        })
        .with_description("Match when the value's text matches a regular expression")
        .with_default_options(serde_json::json!({ "value": ".*" }))
        .with_display_text(|options| {
            let pattern = options.get("value").and_then(|v| v.as_str()).unwrap_or_default();
            format!("Value matches /{}/", pattern)
        }),
    ]
}
