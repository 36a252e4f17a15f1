//! OrganizeTransformer: hide, reorder and rename fields.
//!
//! All three maps are keyed by display name as computed on the input. Fields
//! missing from `indexByName` keep their relative order after the indexed
//! ones. Renaming sets `config.display_name`; the raw name is untouched.

use crate::frame::{display_name, DataFrame};
use crate::pipeline::error::TransformResult;
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizeOptions {
    pub exclude_by_name: HashMap<String, bool>,
    pub index_by_name: HashMap<String, i64>,
    pub rename_by_name: HashMap<String, String>,
}

impl OrganizeOptions {
    fn is_empty(&self) -> bool {
        !self.exclude_by_name.values().any(|&excluded| excluded)
            && self.index_by_name.is_empty()
            && self.rename_by_name.values().all(String::is_empty)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizeTransformer;

impl OrganizeTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        _ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: OrganizeOptions = parse_options(TransformerId::Organize, options)?;
        if options.is_empty() {
            return Ok(passthrough());
        }

        Ok(Box::new(move |frames| {
            frames
                .iter()
                .map(|frame| organize_frame(frame, frames, &options))
                .collect()
        }))
    }
}

fn organize_frame(
    frame: &DataFrame,
    all_frames: &[DataFrame],
    options: &OrganizeOptions,
) -> TransformResult<DataFrame> {
    let mut named: Vec<_> = frame
        .fields()
        .iter()
        .map(|field| (display_name(field, frame, all_frames), field.clone()))
        .filter(|(name, _)| !options.exclude_by_name.get(name).copied().unwrap_or(false))
        .collect();

    named.sort_by_key(|(name, _)| options.index_by_name.get(name).copied().unwrap_or(i64::MAX));

    let fields = named
        .into_iter()
        .map(|(name, mut field)| {
            if let Some(rename) = options.rename_by_name.get(&name).filter(|r| !r.is_empty()) {
                field.config.display_name = Some(rename.clone());
            }
            field
        })
        .collect();
    Ok(frame.replace_fields(fields)?)
}
