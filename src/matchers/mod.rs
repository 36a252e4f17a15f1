//! Declarative predicates over fields, values and frames.
//!
//! A matcher is selected by id and parameterized by JSON options
//! ([`MatcherConfig`]). Resolving a config looks the id up in a
//! [`Registry`] of [`MatcherInfo`] entries, deserializes the options into
//! that matcher's typed option struct, and returns a ready predicate:
//!
//! - [`FieldMatcher`]: `(field?, frame, all frames) -> bool`
//! - [`ValueMatcher`]: `(value, field?) -> bool`
//! - [`FrameMatcher`]: `(frame, index) -> bool`
//!
//! Predicates are built once per pipeline run and then evaluated per field
//! or per row without further lookups.

pub mod error;
pub mod field_name;
pub mod field_type;
pub mod frame;
pub mod logical;
pub mod pattern;
pub mod value;

pub use error::{MatcherError, MatcherResult};
pub use pattern::string_to_regex;

use crate::frame::{DataFrame, Field, Value};
use crate::registry::{Registry, RegistryItem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Built-in field matcher ids.
pub mod field_matcher_id {
    pub const BY_TYPE: &str = "byType";
    pub const NUMERIC: &str = "numeric";
    pub const TIME: &str = "time";
    pub const FIRST: &str = "first";
    pub const FIRST_TIME_FIELD: &str = "firstTimeField";
    pub const BY_NAME: &str = "byName";
    pub const BY_NAMES: &str = "byNames";
    pub const BY_REGEXP: &str = "byRegexp";
    pub const BY_REGEXP_OR_NAMES: &str = "byRegexpOrNames";
    pub const BY_FRAME_REF_ID: &str = "byFrameRefID";
    pub const ANY_MATCH: &str = "anyMatch";
    pub const ALL_MATCH: &str = "allMatch";
    pub const INVERT_MATCH: &str = "invertMatch";
    pub const ALWAYS_MATCH: &str = "alwaysMatch";
    pub const NEVER_MATCH: &str = "neverMatch";
}

/// Built-in value matcher ids.
pub mod value_matcher_id {
    pub const IS_NULL: &str = "isNull";
    pub const IS_NOT_NULL: &str = "isNotNull";
    pub const GREATER: &str = "greater";
    pub const GREATER_OR_EQUAL: &str = "greaterOrEqual";
    pub const LOWER: &str = "lower";
    pub const LOWER_OR_EQUAL: &str = "lowerOrEqual";
    pub const EQUAL: &str = "equal";
    pub const NOT_EQUAL: &str = "notEqual";
    pub const BETWEEN: &str = "between";
    pub const REGEX: &str = "regex";
}

/// Built-in frame matcher ids.
pub mod frame_matcher_id {
    pub const BY_REF_ID: &str = "byRefId";
    pub const BY_INDEX: &str = "byIndex";
}

/// A matcher reference as stored in panel configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
}

impl MatcherConfig {
    pub fn new(id: impl Into<String>, options: impl Serialize) -> Self {
        Self {
            id: id.into(),
            options: serde_json::to_value(options).unwrap_or(serde_json::Value::Null),
        }
    }

    /// A config with no options.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: serde_json::Value::Null,
        }
    }
}

// ── Predicates ──

type FieldMatcherFn = dyn Fn(Option<&Field>, &DataFrame, &[DataFrame]) -> bool + Send + Sync;

/// Predicate over a field within its frame and the full frame set.
///
/// Evaluating without a field ([`FieldMatcher::probe`]) asks whether the
/// matcher applies to the frame generically: type matchers say yes, name
/// matchers say no.
#[derive(Clone)]
pub struct FieldMatcher(Arc<FieldMatcherFn>);

impl FieldMatcher {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Field>, &DataFrame, &[DataFrame]) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Shorthand for matchers that never consult the frame.
    pub fn for_field<F>(when_absent: bool, f: F) -> Self
    where
        F: Fn(&Field) -> bool + Send + Sync + 'static,
    {
        Self::new(move |field, _, _| field.map_or(when_absent, &f))
    }

    #[inline]
    pub fn matches(&self, field: &Field, frame: &DataFrame, all_frames: &[DataFrame]) -> bool {
        (self.0)(Some(field), frame, all_frames)
    }

    #[inline]
    pub fn probe(&self, frame: &DataFrame, all_frames: &[DataFrame]) -> bool {
        (self.0)(None, frame, all_frames)
    }

    /// Raw evaluation with an optional field.
    #[inline]
    pub fn eval(&self, field: Option<&Field>, frame: &DataFrame, all_frames: &[DataFrame]) -> bool {
        (self.0)(field, frame, all_frames)
    }

    /// The logical complement.
    pub fn invert(self) -> Self {
        Self::new(move |field, frame, all| !self.eval(field, frame, all))
    }
}

impl fmt::Debug for FieldMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldMatcher")
    }
}

type ValueMatcherFn = dyn Fn(&Value, Option<&Field>) -> bool + Send + Sync;

/// Predicate over a single cell value.
#[derive(Clone)]
pub struct ValueMatcher(Arc<ValueMatcherFn>);

impl ValueMatcher {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, Option<&Field>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn matches(&self, value: &Value, field: Option<&Field>) -> bool {
        (self.0)(value, field)
    }
}

impl fmt::Debug for ValueMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueMatcher")
    }
}

type FrameMatcherFn = dyn Fn(&DataFrame, usize) -> bool + Send + Sync;

/// Predicate over a frame and its position in the frame set.
#[derive(Clone)]
pub struct FrameMatcher(Arc<FrameMatcherFn>);

impl FrameMatcher {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DataFrame, usize) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn matches(&self, frame: &DataFrame, index: usize) -> bool {
        (self.0)(frame, index)
    }
}

impl fmt::Debug for FrameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrameMatcher")
    }
}

// ── Registry entries ──

type CreateFn<M> =
    dyn Fn(&serde_json::Value, &Registry<MatcherInfo<M>>) -> MatcherResult<M> + Send + Sync;
type DisplayTextFn = dyn Fn(&serde_json::Value) -> String + Send + Sync;

/// A registry entry describing one matcher kind.
///
/// `create` receives the registry itself so that logical matchers can
/// resolve their nested configs.
pub struct MatcherInfo<M> {
    id: String,
    name: String,
    description: String,
    default_options: serde_json::Value,
    exclude_from_picker: bool,
    create: Arc<CreateFn<M>>,
    display_text: Arc<DisplayTextFn>,
}

pub type FieldMatcherInfo = MatcherInfo<FieldMatcher>;
pub type ValueMatcherInfo = MatcherInfo<ValueMatcher>;
pub type FrameMatcherInfo = MatcherInfo<FrameMatcher>;

impl<M> MatcherInfo<M> {
    pub fn new<F>(id: impl Into<String>, name: impl Into<String>, create: F) -> Self
    where
        F: Fn(&serde_json::Value, &Registry<MatcherInfo<M>>) -> MatcherResult<M>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Self {
            id: id.into(),
            name,
            description: String::new(),
            default_options: serde_json::Value::Null,
            exclude_from_picker: false,
            create: Arc::new(create),
            display_text: Arc::new(move |_: &serde_json::Value| label.clone()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default_options(mut self, options: serde_json::Value) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_display_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&serde_json::Value) -> String + Send + Sync + 'static,
    {
        self.display_text = Arc::new(f);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.exclude_from_picker = true;
        self
    }

    pub fn default_options(&self) -> &serde_json::Value {
        &self.default_options
    }

    /// Build the predicate for `options`.
    pub fn create(
        &self,
        options: &serde_json::Value,
        registry: &Registry<MatcherInfo<M>>,
    ) -> MatcherResult<M> {
        (self.create)(options, registry)
    }

    /// Label describing `options`, for showing a saved config in the UI.
    pub fn options_display_text(&self, options: &serde_json::Value) -> String {
        (self.display_text)(options)
    }
}

impl<M> RegistryItem for MatcherInfo<M> {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn exclude_from_picker(&self) -> bool {
        self.exclude_from_picker
    }
}

impl<M> fmt::Debug for MatcherInfo<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// Resolve a config against a registry.
pub fn resolve<M>(registry: &Registry<MatcherInfo<M>>, config: &MatcherConfig) -> MatcherResult<M> {
    let info = registry
        .get_if_exists(&config.id)
        .ok_or_else(|| MatcherError::UnknownMatcher(config.id.clone()))?;
    info.create(&config.options, registry)
}

/// Deserialize matcher options into their typed form.
pub fn parse_options<T: DeserializeOwned>(
    id: &str,
    options: &serde_json::Value,
) -> MatcherResult<T> {
    T::deserialize(options).map_err(|e| MatcherError::InvalidOptions {
        id: id.to_string(),
        message: e.to_string(),
    })
}

/// All built-in field matchers.
pub fn standard_field_matchers() -> Registry<FieldMatcherInfo> {
    let entries = field_type::matchers()
        .into_iter()
        .chain(field_name::matchers())
        .chain(logical::matchers());
    Registry::from_builtins(entries.map(Arc::new))
}

/// All built-in value matchers.
pub fn standard_value_matchers() -> Registry<ValueMatcherInfo> {
    Registry::from_builtins(value::matchers().into_iter().map(Arc::new))
}

/// All built-in frame matchers.
pub fn standard_frame_matchers() -> Registry<FrameMatcherInfo> {
    Registry::from_builtins(frame::matchers().into_iter().map(Arc::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FieldType;
    use serde_json::json;

    #[test]
    fn test_standard_registries_populated() {
        let fields = standard_field_matchers();
        for id in [
            field_matcher_id::BY_TYPE,
            field_matcher_id::NUMERIC,
            field_matcher_id::TIME,
            field_matcher_id::BY_REGEXP,
            field_matcher_id::INVERT_MATCH,
        ] {
            assert!(fields.contains(id), "missing field matcher {}", id);
        }
        assert!(standard_value_matchers().contains(value_matcher_id::BETWEEN));
        assert!(standard_frame_matchers().contains(frame_matcher_id::BY_REF_ID));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let registry = standard_field_matchers();
        let err = resolve(&registry, &MatcherConfig::id("nope")).unwrap_err();
        assert_eq!(err, MatcherError::UnknownMatcher("nope".to_string()));
    }

    #[test]
    fn test_resolve_rejects_malformed_options() {
        let registry = standard_field_matchers();
        let config = MatcherConfig::new(field_matcher_id::BY_TYPE, json!({"not": "a type"}));
        assert!(matches!(
            resolve(&registry, &config),
            Err(MatcherError::InvalidOptions { id, .. }) if id == "byType"
        ));
    }

    #[test]
    fn test_matcher_config_json_shape() {
        let config: MatcherConfig =
            serde_json::from_str(r#"{"id": "byType", "options": "number"}"#).unwrap();
        assert_eq!(config, MatcherConfig::new("byType", FieldType::Number));

        let bare: MatcherConfig = serde_json::from_str(r#"{"id": "numeric"}"#).unwrap();
        assert!(bare.options.is_null());
    }

    #[test]
    fn test_field_matcher_invert() {
        let frame = DataFrame::new(vec![Field::number("a", [1.0])]).unwrap();
        let always = FieldMatcher::new(|_, _, _| true);
        let never = always.clone().invert();
        assert!(always.matches(&frame.fields()[0], &frame, &[]));
        assert!(!never.matches(&frame.fields()[0], &frame, &[]));
    }
}
