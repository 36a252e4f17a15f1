//! Fields: named, typed columns.

use crate::frame::value::{FieldType, Value};
use crate::frame::vector::{FieldVector, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Series tags attached to a field (e.g. `host="a"`).
pub type Labels = BTreeMap<String, String>;

/// Display metadata. Transforms carry it through but never branch on it,
/// except `display_name` which feeds name matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Panel-specific settings, passed through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub custom: serde_json::Value,
}

/// A named, typed column.
///
/// Values live behind an `Arc` so that filtering and reordering fields is
/// a pointer copy. Mutation goes through [`Field::values_mut`], which
/// clones the vector only when it is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub config: FieldConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    pub values: Arc<FieldVector>,
}

impl Field {
    /// Create a field from owned values.
    pub fn new(name: impl Into<String>, field_type: FieldType, values: Vec<Value>) -> Self {
        Self::from_vector(name, field_type, FieldVector::array(values))
    }

    /// Create a field over an existing vector.
    pub fn from_vector(
        name: impl Into<String>,
        field_type: FieldType,
        values: FieldVector,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            config: FieldConfig::default(),
            labels: None,
            values: Arc::new(values),
        }
    }

    /// Create a field whose type is guessed from its first non-null value.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let field_type = FieldType::guess_from(&values);
        Self::new(name, field_type, values)
    }

    /// A `number` field.
    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            FieldType::Number,
            values.into_iter().map(Value::Number).collect(),
        )
    }

    /// A `time` field of epoch milliseconds.
    pub fn time(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            FieldType::Time,
            values.into_iter().map(Value::from).collect(),
        )
    }

    /// A `string` field.
    pub fn string<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            FieldType::String,
            values.into_iter().map(|s| Value::String(s.into())).collect(),
        )
    }

    /// A `boolean` field.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::new(
            name,
            FieldType::Boolean,
            values.into_iter().map(Value::Bool).collect(),
        )
    }

    pub fn with_labels<K, V>(mut self, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = Some(
            labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.config.display_name = Some(display_name.into());
        self
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mutable access to the values, cloning them first if shared.
    pub fn values_mut(&mut self) -> &mut FieldVector {
        Arc::make_mut(&mut self.values)
    }

    /// Whether the field has at least one label.
    pub fn has_labels(&self) -> bool {
        self.labels.as_ref().map_or(false, |l| !l.is_empty())
    }

    /// A copy of this field keeping only the rows at `indices`.
    pub fn take(&self, indices: &[usize]) -> Field {
        Field {
            values: Arc::new(self.values.take(indices)),
            ..self.clone()
        }
    }
}

/// Format labels as `{a="1", b="2"}`.
pub fn format_labels(labels: &Labels) -> String {
    let inner: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v))
        .collect();
    format!("{{{}}}", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::vector::ReadWriteVector;

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Field::number("n", [1.0, 2.0]).field_type, FieldType::Number);
        assert_eq!(Field::time("t", [1, 2]).field_type, FieldType::Time);
        assert_eq!(Field::string("s", ["a"]).field_type, FieldType::String);
        assert_eq!(Field::boolean("b", [true]).field_type, FieldType::Boolean);
    }

    #[test]
    fn test_infer_type() {
        let f = Field::infer("x", vec![Value::Null, Value::from(3.0)]);
        assert_eq!(f.field_type, FieldType::Number);
    }

    #[test]
    fn test_values_mut_copies_on_write() {
        let original = Field::number("n", [1.0, 2.0]);
        let mut copy = original.clone();
        copy.values_mut().set(0, Value::from(9.0)).unwrap();
        assert_eq!(original.values.number(0), Some(1.0));
        assert_eq!(copy.values.number(0), Some(9.0));
    }

    #[test]
    fn test_format_labels_sorted() {
        let f = Field::number("v", [1.0]).with_labels([("b", "2"), ("a", "1")]);
        assert_eq!(format_labels(f.labels.as_ref().unwrap()), r#"{a="1", b="2"}"#);
    }

    #[test]
    fn test_field_json_shape() {
        let f: Field =
            serde_json::from_str(r#"{"name": "cpu", "type": "number", "values": [1, null]}"#)
                .unwrap();
        assert_eq!(f.name, "cpu");
        assert_eq!(f.len(), 2);
        assert_eq!(f.values.get(1), Some(Value::Null));
    }
}
