//! SortByTransformer: reorder rows by field values.
//!
//! Keys name fields by display name; keys naming a missing field are
//! ignored. Sorting is stable and uses [`Value::sort_cmp`], so nulls sort
//! first. A single descending key sorts ascending and then reverses every
//! field, which also reverses the order of equal rows.

use crate::frame::{display_name, DataFrame, Field, MutableVector, Value, Vector};
use crate::pipeline::error::TransformResult;
use crate::pipeline::transformer::{parse_options, passthrough, FrameOperator, TransformContext};
use crate::pipeline::transformer_id::TransformerId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortByField {
    pub field: String,
    pub desc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortByOptions {
    pub sort: Vec<SortByField>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SortByTransformer;

impl SortByTransformer {
    pub fn prepare(
        &self,
        options: &serde_json::Value,
        _ctx: &TransformContext,
    ) -> TransformResult<FrameOperator> {
        let options: SortByOptions = parse_options(TransformerId::SortBy, options)?;
        let keys: Vec<SortByField> = options
            .sort
            .into_iter()
            .filter(|k| !k.field.is_empty())
            .collect();
        if keys.is_empty() {
            return Ok(passthrough());
        }

        Ok(Box::new(move |frames| {
            frames
                .iter()
                .map(|frame| sort_frame(frame, frames, &keys))
                .collect()
        }))
    }
}

fn sort_frame(
    frame: &DataFrame,
    all_frames: &[DataFrame],
    keys: &[SortByField],
) -> TransformResult<DataFrame> {
    let resolved: Vec<(Vec<Value>, bool)> = keys
        .iter()
        .filter_map(|key| {
            frame
                .fields()
                .iter()
                .find(|f| display_name(f, frame, all_frames) == key.field)
                .map(|f: &Field| (f.values.to_vec(), key.desc))
        })
        .collect();
    if resolved.is_empty() {
        return Ok(frame.clone());
    }

    let mut rows: Vec<usize> = (0..frame.length()).collect();

    if let [(values, desc)] = resolved.as_slice() {
        rows.sort_by(|&a, &b| values[a].sort_cmp(&values[b]));
        let sorted = frame.take_rows(&rows);
        if !*desc {
            return Ok(sorted);
        }
        let fields = sorted
            .fields()
            .iter()
            .cloned()
            .map(|mut field| {
                field.values_mut().reverse();
                field
            })
            .collect();
        return Ok(sorted.replace_fields(fields)?);
    }

    rows.sort_by(|&a, &b| {
        resolved
            .iter()
            .map(|(values, desc)| {
                let ordering = values[a].sort_cmp(&values[b]);
                if *desc {
                    ordering.reverse()
                } else {
                    ordering
                }
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    Ok(frame.take_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Catalog;
    use serde_json::json;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Field::string("host", ["b", "a", "c", "a"]),
            Field::number("cpu", [2.0, 3.0, 1.0, 1.0]),
        ])
        .unwrap()
    }

    fn run(options: serde_json::Value) -> DataFrame {
        let catalog = Catalog::standard();
        let op = SortByTransformer
            .prepare(&options, &TransformContext::new(&catalog))
            .unwrap();
        op(&[frame()]).unwrap().remove(0)
    }

    fn column(frame: &DataFrame, name: &str) -> Vec<String> {
        frame
            .field(name)
            .unwrap()
            .values
            .map(|v, _| v.to_string())
    }

    #[test]
    fn test_ascending_is_stable() {
        let out = run(json!({ "sort": [{ "field": "cpu" }] }));
        assert_eq!(column(&out, "cpu"), vec!["1", "1", "2", "3"]);
        assert_eq!(column(&out, "host"), vec!["c", "a", "b", "a"]);
    }

    #[test]
    fn test_descending_reverses() {
        let out = run(json!({ "sort": [{ "field": "cpu", "desc": true }] }));
        assert_eq!(column(&out, "cpu"), vec!["3", "2", "1", "1"]);
        assert_eq!(column(&out, "host"), vec!["a", "b", "a", "c"]);
    }

    #[test]
    fn test_multiple_keys() {
        let out = run(json!({
            "sort": [{ "field": "host" }, { "field": "cpu", "desc": true }],
        }));
        assert_eq!(column(&out, "host"), vec!["a", "a", "b", "c"]);
        assert_eq!(column(&out, "cpu"), vec!["3", "1", "2", "1"]);
    }

    #[test]
    fn test_missing_field_leaves_frame() {
        assert_eq!(run(json!({ "sort": [{ "field": "nope" }] })), frame());
    }
}
