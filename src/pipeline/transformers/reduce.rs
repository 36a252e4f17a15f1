//! ReduceTransformer: collapse fields into single values.
//!
//! - `seriesToRows`: one output frame with a `Field` column naming every
//!   numeric field of every input frame, and one column per reducer.
//! - `reduceFields`: each frame keeps its fields, each reduced to one row.
//!   With several reducers, each field is repeated once per reducer and
//!   tagged with a `reducer` label.
//!
//! Time fields are skipped unless `includeTimeField` is set.

use crate::frame::{display_name, DataFrame, Field, FieldType, Value};
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use crate::reducers::FieldReducerInfo;
use crate::registry::RegistryItem;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the column listing reduced fields in `seriesToRows` mode.
pub const FIELD_COLUMN: &str = "Field";

/// Label added to reduced fields when more than one reducer is applied.
pub const REDUCER_LABEL: &str = "reducer";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReduceMode {
    #[default]
    SeriesToRows,
    ReduceFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReduceOptions {
    pub reducers: Vec<String>,
    pub mode: ReduceMode,
    pub include_time_field: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReduceTransformer;

impl ReduceTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: ReduceOptions = parse_options(TransformerId::Reduce, options)?;
        if options.reducers.is_empty() {
            return Ok(passthrough());
        }

        let reducers = options
            .reducers
            .iter()
            .map(|id| {
                ctx.catalog
                    .reducers
                    .get_if_exists(id)
                    .cloned()
                    .ok_or_else(|| TransformError::UnknownReducer(id.clone()))
            })
            .collect::<TransformResult<Vec<_>>>()?;
        let include_time = options.include_time_field;

        let operator: FrameOperator = match options.mode {
            ReduceMode::SeriesToRows => Box::new(move |frames| {
                Ok(vec![series_to_rows(frames, &reducers, include_time)?])
            }),
            ReduceMode::ReduceFields => Box::new(move |frames| {
                frames
                    .iter()
                    .map(|frame| reduce_fields(frame, &reducers, include_time))
                    .collect()
            }),
        };
        Ok(operator)
    }
}

fn reduced_field(name: &str, values: Vec<Value>) -> Field {
    match FieldType::guess_from(&values) {
        FieldType::Other => Field::new(name, FieldType::Number, values),
        field_type => Field::new(name, field_type, values),
    }
}

fn series_to_rows(
    frames: &[DataFrame],
    reducers: &[Arc<FieldReducerInfo>],
    include_time: bool,
) -> TransformResult<DataFrame> {
    let mut names = Vec::new();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); reducers.len()];

    for frame in frames {
        for field in frame.fields() {
            let keep = match field.field_type {
                FieldType::Number => true,
                FieldType::Time => include_time,
                _ => false,
            };
            if !keep {
                continue;
            }
            names.push(Value::String(display_name(field, frame, frames)));
            for (column, reducer) in columns.iter_mut().zip(reducers) {
                column.push(reducer.reduce(field));
            }
        }
    }

    let mut fields = vec![Field::new(FIELD_COLUMN, FieldType::String, names)];
    fields.extend(
        columns
            .into_iter()
            .zip(reducers)
            .map(|(values, reducer)| reduced_field(reducer.name(), values)),
    );
    Ok(DataFrame::new(fields)?)
}

fn reduce_fields(
    frame: &DataFrame,
    reducers: &[Arc<FieldReducerInfo>],
    include_time: bool,
) -> TransformResult<DataFrame> {
    let mut fields = Vec::new();
    for field in frame.fields() {
        if field.field_type == FieldType::Time && !include_time {
            continue;
        }
        for reducer in reducers {
            let mut reduced = reduced_field(&field.name, vec![reducer.reduce(field)]);
            reduced.config = field.config.clone();
            reduced.labels = field.labels.clone();
            if reducers.len() > 1 {
                reduced
                    .labels
                    .get_or_insert_with(Default::default)
                    .insert(REDUCER_LABEL.to_string(), reducer.name().to_string());
            }
            fields.push(reduced);
        }
    }
    Ok(frame.replace_fields(fields)?)
}
