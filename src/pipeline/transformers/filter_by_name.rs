//! FilterFieldsByNameTransformer: keep or remove fields by display name.
//!
//! Each side takes an explicit name list, a pattern, or both, and is turned
//! into a field matcher config before delegating to `filterFields`.

use crate::matchers::field_name::{ByNamesMode, ByNamesOptions, RegexpOrNamesOptions};
use crate::matchers::{field_matcher_id, MatcherConfig};
use crate::pipeline::error::TransformResult;
use crate::pipeline::transformer::{parse_options, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use crate::pipeline::transformers::filter_fields::{FilterFieldsOptions, FilterFieldsTransformer};
use serde::{Deserialize, Serialize};

/// Names and/or a pattern selecting fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl NameFilter {
    /// The matcher equivalent to this filter, or `None` when it selects nothing.
    pub fn to_matcher_config(&self) -> Option<MatcherConfig> {
        let pattern = self.pattern.clone().filter(|p| !p.is_empty());
        match (pattern, self.names.is_empty()) {
            (Some(pattern), false) => Some(MatcherConfig::new(
                field_matcher_id::BY_REGEXP_OR_NAMES,
                RegexpOrNamesOptions {
                    pattern: Some(pattern),
                    names: self.names.clone(),
                },
            )),
            (Some(pattern), true) => Some(MatcherConfig::new(field_matcher_id::BY_REGEXP, pattern)),
            (None, false) => Some(MatcherConfig::new(
                field_matcher_id::BY_NAMES,
                ByNamesOptions {
                    names: self.names.clone(),
                    mode: ByNamesMode::Include,
                },
            )),
            (None, true) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterFieldsByNameOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<NameFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<NameFilter>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFieldsByNameTransformer;

impl FilterFieldsByNameTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: FilterFieldsByNameOptions =
            parse_options(TransformerId::FilterFieldsByName, options)?;
        let filter = FilterFieldsOptions {
            include: options.include.as_ref().and_then(NameFilter::to_matcher_config),
            exclude: options.exclude.as_ref().and_then(NameFilter::to_matcher_config),
        };
        FilterFieldsTransformer.prepare_with(&filter, ctx)
    }
}
