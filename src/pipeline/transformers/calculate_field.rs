//! CalculateFieldTransformer: append a field computed from other fields.
//!
//! - `binary`: `left <op> right`, where each side is a field display name or
//!   a numeric constant. The result is a lazily computed vector over the
//!   operands; constants become constant vectors of the frame length.
//! - `reduceRow`: apply a reducer across the selected numeric fields of each
//!   row.
//!
//! With `replaceFields`, only the frame's time fields and the new field are
//! kept.

use crate::frame::{
    display_name, BinaryOperation, DataFrame, Field, FieldType, FieldVector, Value, Vector,
};
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::{parse_options, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use crate::reducers::{reducer_id, FieldReducerInfo};
use crate::registry::RegistryItem;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculateFieldMode {
    Binary,
    #[default]
    ReduceRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryOptions {
    pub left: String,
    pub operator: BinaryOperation,
    pub right: String,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self {
            left: String::new(),
            operator: BinaryOperation::Add,
            right: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceRowOptions {
    /// Display names of the fields to reduce; all numeric fields when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    pub reducer: String,
}

impl Default for ReduceRowOptions {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            reducer: reducer_id::SUM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculateFieldOptions {
    pub mode: CalculateFieldMode,
    pub binary: BinaryOptions,
    pub reduce: ReduceRowOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub replace_fields: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculateFieldTransformer;

impl CalculateFieldTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: CalculateFieldOptions =
            parse_options(TransformerId::CalculateField, options)?;
        let alias = options.alias.clone().filter(|a| !a.is_empty());
        let replace = options.replace_fields;

        match options.mode {
            CalculateFieldMode::Binary => {
                let binary = options.binary;
                let name = alias.unwrap_or_else(|| {
                    format!("{} {} {}", binary.left, binary.operator, binary.right)
                });
                Ok(Box::new(move |frames| {
                    frames
                        .iter()
                        .map(|frame| {
                            let field = binary_field(frame, frames, &binary, &name)?;
                            append(frame, field, replace)
                        })
                        .collect()
                }))
            }
            CalculateFieldMode::ReduceRow => {
                let reducer = ctx
                    .catalog
                    .reducers
                    .get_if_exists(&options.reduce.reducer)
                    .cloned()
                    .ok_or_else(|| TransformError::UnknownReducer(options.reduce.reducer.clone()))?;
                let name = alias.unwrap_or_else(|| reducer.name().to_string());
                let include = options.reduce.include;
                Ok(Box::new(move |frames| {
                    frames
                        .iter()
                        .map(|frame| {
                            let field = reduce_row_field(frame, frames, &include, &reducer, &name);
                            append(frame, Some(field), replace)
                        })
                        .collect()
                }))
            }
        }
    }
}

fn append(frame: &DataFrame, field: Option<Field>, replace: bool) -> TransformResult<DataFrame> {
    let Some(field) = field else {
        return Ok(frame.clone());
    };
    let mut fields: Vec<Field> = if replace {
        frame
            .fields()
            .iter()
            .filter(|f| f.field_type == FieldType::Time)
            .cloned()
            .collect()
    } else {
        frame.fields().to_vec()
    };
    fields.push(field);
    Ok(frame.replace_fields(fields)?)
}

/// Resolve an operand to a vector: a field by display name, else a numeric
/// constant.
fn operand(frame: &DataFrame, all_frames: &[DataFrame], name: &str) -> Option<Arc<FieldVector>> {
    if let Some(field) = frame
        .fields()
        .iter()
        .find(|f| display_name(f, frame, all_frames) == name)
    {
        return Some(Arc::clone(&field.values));
    }
    let constant: f64 = name.trim().parse().ok()?;
    Some(Arc::new(FieldVector::constant(
        Value::Number(constant),
        frame.length(),
    )))
}

fn binary_field(
    frame: &DataFrame,
    all_frames: &[DataFrame],
    options: &BinaryOptions,
    name: &str,
) -> TransformResult<Option<Field>> {
    let (Some(left), Some(right)) = (
        operand(frame, all_frames, &options.left),
        operand(frame, all_frames, &options.right),
    ) else {
        return Ok(None);
    };
    let values = FieldVector::binary(left, right, options.operator)?;
    Ok(Some(Field::from_vector(name, FieldType::Number, values)))
}

fn reduce_row_field(
    frame: &DataFrame,
    all_frames: &[DataFrame],
    include: &[String],
    reducer: &FieldReducerInfo,
    name: &str,
) -> Field {
    let sources: Vec<&Field> = frame
        .fields()
        .iter()
        .filter(|f| {
            if include.is_empty() {
                f.field_type == FieldType::Number
            } else {
                include.contains(&display_name(f, frame, all_frames))
            }
        })
        .collect();

    let mut row = Vec::with_capacity(sources.len());
    let values = (0..frame.length())
        .map(|i| {
            row.clear();
            row.extend(sources.iter().map(|f| f.values.get(i).unwrap_or_default()));
            reducer.reduce_values(&row)
        })
        .collect();
    Field::new(name, FieldType::Number, values)
}
