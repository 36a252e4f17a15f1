//! Transformer abstraction for the pipeline.
//!
//! Two-layer design:
//! - **`TransformerPlugin` trait**: for transformers contributed from outside
//!   the crate.
//! - **`BuiltinTransformer` enum**: for all built-in transformers, dispatched
//!   with a match.
//!
//! `AnyTransformer` wraps either variant so registries and the compiler can
//! handle both uniformly.
//!
//! A transformer is not run directly. The compiler first *prepares* it with
//! its options, resolving matchers and reducers once, which yields a
//! [`FrameOperator`] that is then applied to the frame list.

use crate::frame::DataFrame;
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer_id::TransformerId;
use crate::pipeline::transformers::{
    CalculateFieldTransformer, FilterByRefIdTransformer, FilterByValueTransformer,
    FilterFieldsByNameTransformer, FilterFieldsTransformer, LimitTransformer, NoopTransformer,
    OrganizeTransformer, ReduceTransformer, SortByTransformer,
};
use crate::registry::{Catalog, RegistryItem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A transformer reference as stored in panel configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
    /// Disabled steps stay in the config but are skipped when compiling.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl TransformerConfig {
    pub fn new(id: impl Into<String>, options: impl Serialize) -> Self {
        Self {
            id: id.into(),
            options: serde_json::to_value(options).unwrap_or(serde_json::Value::Null),
            disabled: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A prepared transformer: options parsed, matchers and reducers resolved.
///
/// Receives the full frame list so that cross-frame display names can be
/// computed; returns the new frame list.
pub type FrameOperator =
    Box<dyn Fn(&[DataFrame]) -> TransformResult<Vec<DataFrame>> + Send + Sync>;

/// Operator returning its input unchanged.
pub fn passthrough() -> FrameOperator {
    Box::new(|frames| Ok(frames.to_vec()))
}

/// Context passed to transformers while preparing.
pub struct TransformContext<'a> {
    /// Registries to resolve matchers and reducers against.
    pub catalog: &'a Catalog,
}

impl<'a> TransformContext<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }
}

/// Deserialize transformer options. Missing options parse as `{}`, so
/// option structs with `#[serde(default)]` accept an empty config.
pub fn parse_options<T: DeserializeOwned>(
    id: TransformerId,
    options: &serde_json::Value,
) -> TransformResult<T> {
    let empty = serde_json::Value::Object(Default::default());
    let options = if options.is_null() { &empty } else { options };
    T::deserialize(options).map_err(|e| TransformError::InvalidOptions {
        id: id.as_str().to_string(),
        message: e.to_string(),
    })
}

/// Trait for pluggable transformers.
pub trait TransformerPlugin: Send + Sync {
    /// Unique id, used in saved configs.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Parse options and build the operator.
    fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator>;
}

/// Enum dispatch for built-in transformers.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinTransformer {
    Noop(NoopTransformer),
    FilterFields(FilterFieldsTransformer),
    FilterFieldsByName(FilterFieldsByNameTransformer),
    FilterByRefId(FilterByRefIdTransformer),
    FilterByValue(FilterByValueTransformer),
    Organize(OrganizeTransformer),
    CalculateField(CalculateFieldTransformer),
    Reduce(ReduceTransformer),
    SortBy(SortByTransformer),
    Limit(LimitTransformer),
}

impl BuiltinTransformer {
    pub fn from_id(id: TransformerId) -> Self {
        match id {
            TransformerId::Noop => BuiltinTransformer::Noop(NoopTransformer),
            TransformerId::FilterFields => {
                BuiltinTransformer::FilterFields(FilterFieldsTransformer)
            }
            TransformerId::FilterFieldsByName => {
                BuiltinTransformer::FilterFieldsByName(FilterFieldsByNameTransformer)
            }
            TransformerId::FilterByRefId => {
                BuiltinTransformer::FilterByRefId(FilterByRefIdTransformer)
            }
            TransformerId::FilterByValue => {
                BuiltinTransformer::FilterByValue(FilterByValueTransformer)
            }
            TransformerId::Organize => BuiltinTransformer::Organize(OrganizeTransformer),
            TransformerId::CalculateField => {
                BuiltinTransformer::CalculateField(CalculateFieldTransformer)
            }
            TransformerId::Reduce => BuiltinTransformer::Reduce(ReduceTransformer),
            TransformerId::SortBy => BuiltinTransformer::SortBy(SortByTransformer),
            TransformerId::Limit => BuiltinTransformer::Limit(LimitTransformer),
        }
    }

    pub fn id(&self) -> TransformerId {
        match self {
            BuiltinTransformer::Noop(_) => TransformerId::Noop,
            BuiltinTransformer::FilterFields(_) => TransformerId::FilterFields,
            BuiltinTransformer::FilterFieldsByName(_) => TransformerId::FilterFieldsByName,
            BuiltinTransformer::FilterByRefId(_) => TransformerId::FilterByRefId,
            BuiltinTransformer::FilterByValue(_) => TransformerId::FilterByValue,
            BuiltinTransformer::Organize(_) => TransformerId::Organize,
            BuiltinTransformer::CalculateField(_) => TransformerId::CalculateField,
            BuiltinTransformer::Reduce(_) => TransformerId::Reduce,
            BuiltinTransformer::SortBy(_) => TransformerId::SortBy,
            BuiltinTransformer::Limit(_) => TransformerId::Limit,
        }
    }

    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        match self {
            BuiltinTransformer::Noop(t) => t.prepare(options, ctx),
            BuiltinTransformer::FilterFields(t) => t.prepare(options, ctx),
            BuiltinTransformer::FilterFieldsByName(t) => t.prepare(options, ctx),
            BuiltinTransformer::FilterByRefId(t) => t.prepare(options, ctx),
            BuiltinTransformer::FilterByValue(t) => t.prepare(options, ctx),
            BuiltinTransformer::Organize(t) => t.prepare(options, ctx),
            BuiltinTransformer::CalculateField(t) => t.prepare(options, ctx),
            BuiltinTransformer::Reduce(t) => t.prepare(options, ctx),
            BuiltinTransformer::SortBy(t) => t.prepare(options, ctx),
            BuiltinTransformer::Limit(t) => t.prepare(options, ctx),
        }
    }
}

/// Wrapper that holds either a built-in transformer (enum dispatch) or a
/// plugin (trait object).
#[derive(Clone)]
pub enum AnyTransformer {
    Builtin(BuiltinTransformer),
    Plugin(Arc<dyn TransformerPlugin>),
}

impl AnyTransformer {
    pub fn builtin(id: TransformerId) -> Self {
        AnyTransformer::Builtin(BuiltinTransformer::from_id(id))
    }

    pub fn plugin(plugin: impl TransformerPlugin + 'static) -> Self {
        AnyTransformer::Plugin(Arc::new(plugin))
    }

    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        match self {
            AnyTransformer::Builtin(t) => t.prepare(options, ctx),
            AnyTransformer::Plugin(t) => t.prepare(options, ctx),
        }
    }
}

impl RegistryItem for AnyTransformer {
    fn id(&self) -> &str {
        match self {
            AnyTransformer::Builtin(t) => t.id().as_str(),
            AnyTransformer::Plugin(t) => t.id(),
        }
    }

    fn name(&self) -> &str {
        match self {
            AnyTransformer::Builtin(t) => t.id().display_name(),
            AnyTransformer::Plugin(t) => t.name(),
        }
    }

    fn description(&self) -> &str {
        match self {
            AnyTransformer::Builtin(t) => t.id().description(),
            AnyTransformer::Plugin(t) => t.description(),
        }
    }

    fn exclude_from_picker(&self) -> bool {
        match self {
            AnyTransformer::Builtin(t) => t.id().is_internal(),
            AnyTransformer::Plugin(_) => false,
        }
    }
}

impl fmt::Debug for AnyTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyTransformer::Builtin(t) => write!(f, "Builtin({})", t.id()),
            AnyTransformer::Plugin(t) => write!(f, "Plugin({})", t.id()),
        }
    }
}
