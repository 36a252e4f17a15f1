//! FilterByValueTransformer: keep or remove rows by cell conditions.
//!
//! Each filter names a field (by display name) and a value matcher. For
//! every row, the filters are combined with `any` or `all`; matching rows
//! are kept (`include`) or dropped (`exclude`). Filters naming a field the
//! frame does not have are ignored for that frame.

use crate::frame::{display_name, DataFrame, Field, Value, Vector};
use crate::matchers::{resolve, MatcherConfig, ValueMatcher};
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterByValueType {
    #[default]
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterByValueMatch {
    #[default]
    Any,
    All,
}

/// One condition: a field and the value matcher applied to its cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueFilter {
    pub field_name: String,
    pub config: MatcherConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterByValueOptions {
    #[serde(rename = "type")]
    pub filter_type: FilterByValueType,
    #[serde(rename = "match")]
    pub match_mode: FilterByValueMatch,
    pub filters: Vec<ValueFilter>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterByValueTransformer;

impl FilterByValueTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: FilterByValueOptions = parse_options(TransformerId::FilterByValue, options)?;
        if options.filters.is_empty() {
            return Ok(passthrough());
        }

        let filters = options
            .filters
            .iter()
            .map(|f| {
                resolve(&ctx.catalog.value_matchers, &f.config)
                    .map(|m| (f.field_name.clone(), m))
                    .map_err(|e| TransformError::matcher(TransformerId::FilterByValue.as_str(), e))
            })
            .collect::<TransformResult<Vec<_>>>()?;
        let include = options.filter_type == FilterByValueType::Include;
        let match_all = options.match_mode == FilterByValueMatch::All;

        Ok(Box::new(move |frames| {
            Ok(frames
                .iter()
                .map(|frame| filter_rows(frame, frames, &filters, include, match_all))
                .collect())
        }))
    }
}

fn filter_rows(
    frame: &DataFrame,
    all_frames: &[DataFrame],
    filters: &[(String, ValueMatcher)],
    include: bool,
    match_all: bool,
) -> DataFrame {
    let active: Vec<(&Field, &ValueMatcher)> = filters
        .iter()
        .filter_map(|(name, matcher)| {
            frame
                .fields()
                .iter()
                .find(|f| display_name(f, frame, all_frames) == *name)
                .map(|field| (field, matcher))
        })
        .collect();
    if active.is_empty() {
        return frame.clone();
    }

    let row_matches = |row: usize| {
        let mut results = active.iter().map(|&(field, matcher)| {
            let value = field.values.get(row).unwrap_or(Value::Null);
            matcher.matches(&value, Some(field))
        });
        if match_all {
            results.all(|m| m)
        } else {
            results.any(|m| m)
        }
    };

    let rows: Vec<usize> = (0..frame.length())
        .filter(|&row| row_matches(row) == include)
        .collect();
    if rows.len() == frame.length() {
        return frame.clone();
    }
    frame.take_rows(&rows)
}
