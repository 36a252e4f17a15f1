//! FilterFieldsTransformer: keep fields selected by field matchers.
//!
//! A field is kept when the `include` matcher (if any) matches it and the
//! `exclude` matcher (if any) does not. Without either, frames pass through.
//! Frames whose fields are all removed are kept with no fields and length 0.

use crate::frame::DataFrame;
use crate::matchers::{resolve, FieldMatcher, MatcherConfig};
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterFieldsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<MatcherConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<MatcherConfig>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterFieldsTransformer;

impl FilterFieldsTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: FilterFieldsOptions = parse_options(TransformerId::FilterFields, options)?;
        self.prepare_with(&options, ctx)
    }

    /// Prepare from already-typed options, for transformers that delegate here.
    pub fn prepare_with(
        &self,
        options: &FilterFieldsOptions,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let registry = &ctx.catalog.field_matchers;
        let resolve_one = |config: &MatcherConfig| {
            resolve(registry, config)
                .map_err(|e| TransformError::matcher(TransformerId::FilterFields.as_str(), e))
        };

        let include = options.include.as_ref().map(resolve_one).transpose()?;
        let exclude = options.exclude.as_ref().map(resolve_one).transpose()?;
        if include.is_none() && exclude.is_none() {
            return Ok(passthrough());
        }

        Ok(Box::new(move |frames| {
            filter_fields(frames, include.as_ref(), exclude.as_ref())
        }))
    }
}

/// Keep fields matched by `include` and not matched by `exclude`, preserving
/// field order. Display names are resolved against the whole frame list.
pub fn filter_fields(
    frames: &[DataFrame],
    include: Option<&FieldMatcher>,
    exclude: Option<&FieldMatcher>,
) -> TransformResult<Vec<DataFrame>> {
    frames
        .iter()
        .map(|frame| {
            let fields: Vec<_> = frame
                .fields()
                .iter()
                .filter(|field| {
                    include.map_or(true, |m| m.matches(field, frame, frames))
                        && !exclude.map_or(false, |m| m.matches(field, frame, frames))
                })
                .cloned()
                .collect();
            if fields.len() == frame.field_count() {
                return Ok(frame.clone());
            }
            Ok(frame.replace_fields(fields)?)
        })
        .collect()
}
