//! FilterByRefIdTransformer: keep frames produced by matching queries.

use crate::matchers::{frame_matcher_id, resolve, MatcherConfig};
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterByRefIdOptions {
    /// Ref id, or `/pattern/` to match several.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterByRefIdTransformer;

impl FilterByRefIdTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: FilterByRefIdOptions = parse_options(TransformerId::FilterByRefId, options)?;
        let Some(include) = options.include.filter(|p| !p.is_empty()) else {
            return Ok(passthrough());
        };

        let config = MatcherConfig::new(frame_matcher_id::BY_REF_ID, include);
        let matcher = resolve(&ctx.catalog.frame_matchers, &config)
            .map_err(|e| TransformError::matcher(TransformerId::FilterByRefId.as_str(), e))?;

        Ok(Box::new(move |frames| {
            Ok(frames
                .iter()
                .enumerate()
                .filter(|(index, frame)| matcher.matches(frame, *index))
                .map(|(_, frame)| frame.clone())
                .collect())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DataFrame, Field};
    use crate::registry::Catalog;
    use serde_json::json;

    fn frames() -> Vec<DataFrame> {
        ["A", "B", "C"]
            .iter()
            .map(|r| {
                DataFrame::new(vec![Field::number("v", [1.0])])
                    .unwrap()
                    .with_ref_id(*r)
            })
            .collect()
    }

    fn run(options: serde_json::Value) -> Vec<String> {
        let catalog = Catalog::standard();
        let op = FilterByRefIdTransformer
            .prepare(&options, &TransformContext::new(&catalog))
            .unwrap();
        op(&frames())
            .unwrap()
            .into_iter()
            .filter_map(|f| f.ref_id)
            .collect()
    }

    #[test]
    fn test_exact_ref_id() {
        assert_eq!(run(json!({ "include": "B" })), vec!["B"]);
    }

    #[test]
    fn test_pattern() {
        assert_eq!(run(json!({ "include": "/A|C/" })), vec!["A", "C"]);
    }

    #[test]
    fn test_no_include_is_passthrough() {
        assert_eq!(run(json!({})).len(), 3);
    }
}
