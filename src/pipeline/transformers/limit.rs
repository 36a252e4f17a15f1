//! LimitTransformer: keep the first `limitField` rows of every frame.

use crate::pipeline::error::TransformResult;
use crate::pipeline::transformer::{parse_options, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};

/// Row limit used when none is configured.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitOptions {
    pub limit_field: usize,
}

impl Default for LimitOptions {
    fn default() -> Self {
        Self {
            limit_field: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LimitTransformer;

impl LimitTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        _ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let LimitOptions { limit_field: limit } = parse_options(TransformerId::Limit, options)?;

        Ok(Box::new(move |frames| {
            Ok(frames
                .iter()
                .map(|frame| {
                    if frame.length() <= limit {
                        frame.clone()
                    } else {
                        let rows: Vec<usize> = (0..limit).collect();
                        frame.take_rows(&rows)
                    }
                })
                .collect())
        }))
    }
}
