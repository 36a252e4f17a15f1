//! Columnar data model consumed and produced by every transform.
//!
//! - [`Value`] / [`FieldType`]: dynamically-typed cells and column types.
//! - [`FieldVector`]: the vector variants backing a column (see [`vector`]).
//! - [`Field`]: a named, typed, optionally labeled column.
//! - [`DataFrame`]: ordered fields sharing one row count.
//!
//! Frames validate their row count on construction, so every transform can
//! rely on `frame.length() == field.len()` for all of its fields.

pub mod binary_op;
pub mod display;
pub mod error;
pub mod field;
pub mod value;
pub mod vector;

pub use binary_op::BinaryOperation;
pub use display::display_name;

use display::NameCounts;
pub use error::{FrameError, FrameResult};
pub use field::{format_labels, Field, FieldConfig, Labels};
pub use value::{FieldType, Value};
pub use vector::{
    ArrayVector, BinaryOperationVector, ConstantVector, FieldVector, MutableVector,
    ReadWriteVector, Vector,
};

use serde::{Deserialize, Serialize};

/// One query result: ordered fields of equal length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct DataFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "refId", default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    fields: Vec<Field>,
    length: usize,
    #[serde(skip)]
    name_counts: NameCounts,
}

impl DataFrame {
    /// Build a frame, checking that all fields have the same length.
    ///
    /// The frame length is taken from the first field (0 when empty).
    pub fn new(fields: Vec<Field>) -> FrameResult<Self> {
        let length = fields.first().map_or(0, Field::len);
        Self::with_length(fields, length)
    }

    /// Build a frame with an explicit row count.
    pub fn with_length(fields: Vec<Field>, length: usize) -> FrameResult<Self> {
        if let Some(bad) = fields.iter().find(|f| f.len() != length) {
            return Err(FrameError::FieldLengthMismatch {
                field: bad.name.clone(),
                expected: length,
                actual: bad.len(),
            });
        }
        Ok(Self {
            name: None,
            ref_id: None,
            fields,
            length,
            name_counts: NameCounts::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    /// Row count.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// First field with the given raw name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields named `name` that have no explicit display name.
    pub(crate) fn raw_name_count(&self, name: &str) -> usize {
        self.name_counts.count(&self.fields, name)
    }

    /// First field whose display name (see [`display_name`]) equals `name`.
    pub fn field_by_display_name(&self, name: &str, all_frames: &[DataFrame]) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| display_name(f, self, all_frames) == name)
    }

    /// Append a field. Its length must match the frame's row count, unless the
    /// frame has no fields yet, in which case it sets the row count.
    pub fn push_field(&mut self, field: Field) -> FrameResult<()> {
        if self.fields.is_empty() {
            self.length = field.len();
        } else if field.len() != self.length {
            let actual = field.len();
            return Err(FrameError::FieldLengthMismatch {
                field: field.name,
                expected: self.length,
                actual,
            });
        }
        self.fields.push(field);
        self.name_counts.invalidate();
        Ok(())
    }

    /// Replace the field list, keeping name and ref id.
    pub fn replace_fields(&self, fields: Vec<Field>) -> FrameResult<DataFrame> {
        let mut frame = DataFrame::new(fields)?;
        frame.name = self.name.clone();
        frame.ref_id = self.ref_id.clone();
        Ok(frame)
    }

    /// A copy keeping only the rows at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> DataFrame {
        DataFrame {
            name: self.name.clone(),
            ref_id: self.ref_id.clone(),
            fields: self.fields.iter().map(|f| f.take(indices)).collect(),
            length: indices.len(),
            name_counts: self.name_counts.clone(),
        }
    }
}

/// Wire shape of a frame before length validation.
#[derive(Deserialize)]
struct RawFrame {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "refId", default)]
    ref_id: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    length: Option<usize>,
}

impl TryFrom<RawFrame> for DataFrame {
    type Error = FrameError;

    fn try_from(raw: RawFrame) -> FrameResult<Self> {
        let mut frame = match raw.length {
            Some(length) => DataFrame::with_length(raw.fields, length)?,
            None => DataFrame::new(raw.fields)?,
        };
        frame.name = raw.name;
        frame.ref_id = raw.ref_id;
        Ok(frame)
    }
}
