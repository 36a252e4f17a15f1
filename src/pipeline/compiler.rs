use super::compiled_plan::{
    CompiledPlan, CompiledStep, ErrorPolicy, PipelineOutput, PlanStats, SkipReason, SkippedStep,
};
use super::error::{TransformError, TransformResult};
use super::transformer::{TransformContext, TransformerConfig};
use crate::frame::DataFrame;
use crate::registry::Catalog;

/// Compiles transformer configs into an execution plan
pub struct PipelineCompiler;

impl PipelineCompiler {
    /// Compile a list of transformer configs against a catalog snapshot.
    ///
    /// Each enabled config is resolved by id and prepared with its options,
    /// so matchers and reducers are looked up once per compile rather than
    /// once per frame. Configs that are disabled, name an unknown
    /// transformer, or carry invalid options are recorded in
    /// [`CompiledPlan::skipped`] and left out of the plan.
    ///
    /// # Arguments
    /// * `configs` - Transformer configs in execution order
    /// * `catalog` - Registries to resolve transformers, matchers and reducers
    pub fn compile(configs: &[TransformerConfig], catalog: &Catalog) -> CompiledPlan {
        let start_time = std::time::Instant::now();
        let ctx = TransformContext::new(catalog);

        let mut steps = Vec::with_capacity(configs.len());
        let mut skipped = Vec::new();

        for (index, config) in configs.iter().enumerate() {
            if config.disabled {
                tracing::debug!("Skipping disabled transformer {} ({})", index, config.id);
                skipped.push(SkippedStep {
                    index,
                    id: config.id.clone(),
                    reason: SkipReason::Disabled,
                });
                continue;
            }

            let prepared = catalog
                .transformers
                .get_if_exists(&config.id)
                .ok_or_else(|| TransformError::UnknownTransformer(config.id.clone()))
                .and_then(|transformer| transformer.prepare(&config.options, &ctx));

            match prepared {
                Ok(operator) => steps.push(CompiledStep {
                    index,
                    id: config.id.clone(),
                    operator,
                }),
                Err(error) => {
                    tracing::warn!("Transformer {} ({}) skipped: {}", index, config.id, error);
                    skipped.push(SkippedStep {
                        index,
                        id: config.id.clone(),
                        reason: SkipReason::Error(error),
                    });
                }
            }
        }

        let disabled_steps = skipped
            .iter()
            .filter(|s| s.reason == SkipReason::Disabled)
            .count();
        let stats = PlanStats {
            total_steps: configs.len(),
            active_steps: steps.len(),
            disabled_steps,
            failed_steps: skipped.len() - disabled_steps,
            compile_time_us: start_time.elapsed().as_micros() as u64,
        };
        tracing::debug!(
            "Compiled {} of {} transformer(s) in {}us",
            stats.active_steps,
            stats.total_steps,
            stats.compile_time_us
        );

        CompiledPlan {
            steps,
            skipped,
            stats,
            ..CompiledPlan::default()
        }
    }
}

/// Compile `configs` and run them over `frames` in one call.
pub fn transform_frames(
    configs: &[TransformerConfig],
    frames: Vec<DataFrame>,
    catalog: &Catalog,
    policy: ErrorPolicy,
) -> TransformResult<PipelineOutput> {
    PipelineCompiler::compile(configs, catalog)
        .with_policy(policy)
        .execute(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Field, Vector};
    use serde_json::json;

    fn frames() -> Vec<DataFrame> {
        vec![DataFrame::new(vec![
            Field::time("time", [1, 2, 3]),
            Field::number("cpu", [3.0, 1.0, 2.0]),
        ])
        .unwrap()]
    }

    fn config(id: &str, options: serde_json::Value) -> TransformerConfig {
        TransformerConfig::new(id, options)
    }

    #[test]
    fn test_compile_empty() {
        let plan = PipelineCompiler::compile(&[], &Catalog::standard());
        assert!(plan.is_empty());
        assert_eq!(plan.stats.total_steps, 0);
        let output = plan.execute(frames()).unwrap();
        assert_eq!(output.frames, frames());
    }

    #[test]
    fn test_disabled_and_unknown_steps_are_skipped() {
        let configs = vec![
            config("limit", json!({ "limitField": 1 })).disabled(),
            config("pivot", json!({})),
            config("noop", json!(null)),
        ];
        let plan = PipelineCompiler::compile(&configs, &Catalog::standard());

        assert_eq!(plan.stats.total_steps, 3);
        assert_eq!(plan.stats.active_steps, 1);
        assert_eq!(plan.stats.disabled_steps, 1);
        assert_eq!(plan.stats.failed_steps, 1);
        assert_eq!(plan.skipped[0].reason, SkipReason::Disabled);
        assert_eq!(
            plan.skipped[1].reason,
            SkipReason::Error(TransformError::UnknownTransformer("pivot".to_string()))
        );
    }

    #[test]
    fn test_unknown_transformer_passes_through() {
        let configs = vec![
            config("pivot", json!({})),
            config("limit", json!({ "limitField": 2 })),
        ];
        let output = PipelineCompiler::compile(&configs, &Catalog::standard())
            .execute(frames())
            .unwrap();
        assert_eq!(output.frames[0].length(), 2);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].index, 0);
    }

    #[test]
    fn test_fail_policy_aborts() {
        let configs = vec![config("limit", json!({ "limitField": "many" }))];
        let plan = PipelineCompiler::compile(&configs, &Catalog::standard())
            .with_policy(ErrorPolicy::Fail);
        let err = plan.execute(frames()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::StepFailed { index: 0, ref id, .. } if id == "limit"
        ));
    }

    #[test]
    fn test_steps_run_in_order() {
        let configs = vec![
            config("sortBy", json!({ "sort": [{ "field": "cpu" }] })),
            config("limit", json!({ "limitField": 1 })),
        ];
        let output =
            transform_frames(&configs, frames(), &Catalog::standard(), ErrorPolicy::Fail).unwrap();
        assert!(output.is_clean());
        let cpu = output.frames[0].field("cpu").unwrap();
        assert_eq!(cpu.values.number(0), Some(1.0));
    }
}
