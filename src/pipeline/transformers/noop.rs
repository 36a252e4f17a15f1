//! NoopTransformer: returns its input unchanged.

use crate::pipeline::error::TransformResult;
use crate::pipeline::transformer::{passthrough, FrameOperator, TransformContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransformer;

impl NoopTransformer {
    pub fn prepare(
        &self,
        _options: &serde_json::Value,
        _ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        Ok(passthrough())
    }
}
