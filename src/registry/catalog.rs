//! The set of registries a pipeline compiles against.
//!
//! A [`Catalog`] is an immutable snapshot: compiling a plan borrows one,
//! and plugin [`Contribution`]s produce a new one through [`CatalogFold`].

use crate::matchers::{
    standard_field_matchers, standard_frame_matchers, standard_value_matchers, FieldMatcherInfo,
    FrameMatcherInfo, ValueMatcherInfo,
};
use crate::pipeline::{AnyTransformer, TransformerId};
use crate::reducers::{standard_reducers, FieldReducerInfo};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::reactive::{ReactiveRegistry, RegistryFold};
use crate::registry::{Registry, RegistryItem};
use std::sync::Arc;

/// Every registry the pipeline resolves ids against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub field_matchers: Registry<FieldMatcherInfo>,
    pub value_matchers: Registry<ValueMatcherInfo>,
    pub frame_matchers: Registry<FrameMatcherInfo>,
    pub transformers: Registry<AnyTransformer>,
    pub reducers: Registry<FieldReducerInfo>,
}

impl Catalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with every built-in matcher, transformer and reducer.
    pub fn standard() -> Self {
        let transformers = Registry::from_builtins(
            TransformerId::all()
                .iter()
                .map(|id| Arc::new(AnyTransformer::builtin(*id))),
        );

        Self {
            field_matchers: standard_field_matchers(),
            value_matchers: standard_value_matchers(),
            frame_matchers: standard_frame_matchers(),
            transformers,
            reducers: standard_reducers(),
        }
    }

    /// Wrap this catalog as the first snapshot of a [`CatalogRegistry`].
    pub fn into_registry(self) -> CatalogRegistry {
        ReactiveRegistry::new(CatalogFold, self)
    }

    /// Add every entry of `contribution`, failing on the first taken id.
    fn extend(&mut self, contribution: Contribution) -> RegistryResult<()> {
        register_all(&mut self.field_matchers, contribution.field_matchers)?;
        register_all(&mut self.value_matchers, contribution.value_matchers)?;
        register_all(&mut self.frame_matchers, contribution.frame_matchers)?;
        register_all(&mut self.transformers, contribution.transformers)?;
        register_all(&mut self.reducers, contribution.reducers)?;
        Ok(())
    }
}

fn register_all<T: RegistryItem + ?Sized>(
    registry: &mut Registry<T>,
    items: Vec<Arc<T>>,
) -> RegistryResult<()> {
    items.into_iter().try_for_each(|item| registry.register(item))
}

/// Entries contributed by one plugin.
#[derive(Debug, Default)]
pub struct Contribution {
    /// Identifies the contributor in logs and errors.
    pub source: String,
    pub field_matchers: Vec<Arc<FieldMatcherInfo>>,
    pub value_matchers: Vec<Arc<ValueMatcherInfo>>,
    pub frame_matchers: Vec<Arc<FrameMatcherInfo>>,
    pub transformers: Vec<Arc<AnyTransformer>>,
    pub reducers: Vec<Arc<FieldReducerInfo>>,
}

impl Contribution {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_field_matcher(mut self, info: FieldMatcherInfo) -> Self {
        self.field_matchers.push(Arc::new(info));
        self
    }

    pub fn with_value_matcher(mut self, info: ValueMatcherInfo) -> Self {
        self.value_matchers.push(Arc::new(info));
        self
    }

    pub fn with_frame_matcher(mut self, info: FrameMatcherInfo) -> Self {
        self.frame_matchers.push(Arc::new(info));
        self
    }

    pub fn with_transformer(mut self, transformer: AnyTransformer) -> Self {
        self.transformers.push(Arc::new(transformer));
        self
    }

    pub fn with_reducer(mut self, info: FieldReducerInfo) -> Self {
        self.reducers.push(Arc::new(info));
        self
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.field_matchers.len()
            + self.value_matchers.len()
            + self.frame_matchers.len()
            + self.transformers.len()
            + self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Folds contributions into catalog snapshots.
///
/// A contribution is all-or-nothing: if any of its ids is already taken
/// (including by an earlier entry of the same contribution), none of its
/// entries are added and the existing entry keeps the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFold;

impl RegistryFold for CatalogFold {
    type Item = Contribution;
    type State = Catalog;

    fn fold(&self, previous: &Catalog, contribution: Contribution) -> RegistryResult<Catalog> {
        let source_id = contribution.source.clone();
        let count = contribution.len();

        let mut next = previous.clone();
        next.extend(contribution)
            .map_err(|e| RegistryError::Rejected {
                source_id: source_id.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Added {} catalog entries from '{}'", count, source_id);
        Ok(next)
    }
}

/// Reactive registry publishing [`Catalog`] snapshots.
pub type CatalogRegistry = ReactiveRegistry<CatalogFold>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DataFrame, Field, Value};
    use crate::matchers::{resolve, FieldMatcher, MatcherConfig};
    use crate::pipeline::{
        FrameOperator, PipelineCompiler, TransformContext, TransformResult, TransformerConfig,
        TransformerPlugin,
    };

    struct Reverse;

    impl TransformerPlugin for Reverse {
        fn id(&self) -> &str {
            "reverseFrames"
        }

        fn name(&self) -> &str {
            "Reverse frames"
        }

        fn prepare(
            &self,
            _options: &serde_json::Value,
            _ctx: &TransformContext,
        ) -> TransformResult<FrameOperator> {
            Ok(Box::new(|frames| Ok(frames.iter().rev().cloned().collect())))
        }
    }

    fn named_matcher(id: &str) -> FieldMatcherInfo {
        FieldMatcherInfo::new(id, id, |_: &serde_json::Value, _: &Registry<FieldMatcherInfo>| {
            Ok(FieldMatcher::for_field(false, |field: &Field| {
                field.name.starts_with('x')
            }))
        })
    }

    #[test]
    fn test_standard_has_every_builtin_transformer() {
        let catalog = Catalog::standard();
        for id in TransformerId::all() {
            assert!(catalog.transformers.contains(id.as_str()), "{id}");
        }
        assert!(catalog.reducers.contains("sum"));
        assert!(catalog.value_matchers.contains("isNull"));
        assert!(catalog.frame_matchers.contains("byRefId"));
        assert!(Catalog::empty().transformers.is_empty());
    }

    #[test]
    fn test_contribution_adds_entries() {
        let registry = Catalog::standard().into_registry();
        registry
            .register(
                Contribution::new("plugin-a")
                    .with_transformer(AnyTransformer::plugin(Reverse))
                    .with_field_matcher(named_matcher("startsWithX")),
            )
            .unwrap();

        let catalog = registry.snapshot();
        assert!(catalog.transformers.contains("reverseFrames"));
        let matcher = resolve(&catalog.field_matchers, &MatcherConfig::id("startsWithX")).unwrap();
        let frame = DataFrame::new(vec![Field::number("x1", [1.0])]).unwrap();
        assert!(matcher.matches(&frame.fields()[0], &frame, &[]));
    }

    #[test]
    fn test_plugin_transformer_runs() {
        let registry = Catalog::standard().into_registry();
        registry
            .register(
                Contribution::new("plugin-a").with_transformer(AnyTransformer::plugin(Reverse)),
            )
            .unwrap();

        let frames = vec![
            DataFrame::new(vec![Field::number("a", [1.0])]).unwrap().with_ref_id("A"),
            DataFrame::new(vec![Field::number("b", [2.0])]).unwrap().with_ref_id("B"),
        ];
        let configs = [TransformerConfig::new("reverseFrames", ())];
        let output = PipelineCompiler::compile(&configs, &registry.snapshot())
            .execute(frames)
            .unwrap();
        assert_eq!(output.frames[0].ref_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_colliding_contribution_is_rejected_whole() {
        let registry = Catalog::standard().into_registry();
        let before = registry.snapshot();

        let err = registry
            .register(
                Contribution::new("plugin-b")
                    .with_reducer(FieldReducerInfo::new("median", "Median", |_| Value::Null))
                    .with_field_matcher(named_matcher("byName")),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Rejected { ref source_id, .. } if source_id == "plugin-b"
        ));

        let after = registry.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(!after.reducers.contains("median"));
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_contributions() {
        let registry = Catalog::empty().into_registry();
        registry
            .register(Contribution::new("a").with_transformer(AnyTransformer::plugin(Reverse)))
            .unwrap();
        registry
            .register(Contribution::new("b").with_field_matcher(named_matcher("startsWithX")))
            .unwrap();

        let mut subscription = registry.subscribe();
        let catalog = subscription.next().await.unwrap();
        assert_eq!(catalog.transformers.len(), 1);
        assert_eq!(catalog.field_matchers.len(), 1);
    }
}
