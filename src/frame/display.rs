//! Display names for fields.
//!
//! Name-based matchers compare against the display name rather than the raw
//! field name, so that same-named series coming from different queries can
//! be told apart by their labels.

use crate::frame::field::{format_labels, Field};
use crate::frame::DataFrame;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Fallback used when neither the field nor the frame has a name.
pub const DEFAULT_FIELD_NAME: &str = "Value";

/// Compute the name a field is shown (and matched) under.
///
/// 1. An explicit `config.display_name` always wins.
/// 2. Otherwise the field name, or the frame name / [`DEFAULT_FIELD_NAME`]
///    when the field name is empty.
/// 3. If the field has labels and another field in scope shares its raw
///    name, the labels are appended: `cpu {host="a"}`.
///
/// `all_frames` is the scope used for the ambiguity check; when empty, only
/// `frame` is considered.
pub fn display_name(field: &Field, frame: &DataFrame, all_frames: &[DataFrame]) -> String {
    if let Some(name) = field.config.display_name.as_deref() {
        return name.to_string();
    }

    let base = if !field.name.is_empty() {
        field.name.as_str()
    } else if let Some(name) = frame.name.as_deref().filter(|n| !n.is_empty()) {
        name
    } else if field.has_labels() {
        // Labels alone identify the series.
        return field.labels.as_ref().map(format_labels).unwrap_or_default();
    } else {
        DEFAULT_FIELD_NAME
    };

    match field.labels.as_ref() {
        Some(labels) if !labels.is_empty() && is_ambiguous(field, frame, all_frames) => {
            format!("{} {}", base, format_labels(labels))
        }
        _ => base.to_string(),
    }
}

fn is_ambiguous(field: &Field, frame: &DataFrame, all_frames: &[DataFrame]) -> bool {
    let count: usize = if all_frames.is_empty() {
        frame.raw_name_count(&field.name)
    } else {
        all_frames
            .iter()
            .map(|fr| fr.raw_name_count(&field.name))
            .sum()
    };
    count > 1
}

/// How many fields of a frame share each raw name, counting only fields
/// without an explicit display name. Built on first use.
#[derive(Clone, Default)]
pub(crate) struct NameCounts(OnceLock<HashMap<String, usize>>);

impl NameCounts {
    pub(crate) fn count(&self, fields: &[Field], name: &str) -> usize {
        let counts = self.0.get_or_init(|| {
            let mut counts = HashMap::new();
            for field in fields.iter().filter(|f| f.config.display_name.is_none()) {
                *counts.entry(field.name.clone()).or_insert(0) += 1;
            }
            counts
        });
        counts.get(name).copied().unwrap_or(0)
    }

    /// Drop the cached counts after the field list changes.
    pub(crate) fn invalidate(&mut self) {
        self.0 = OnceLock::new();
    }
}

// Derived data; two frames with equal fields have equal counts.
impl PartialEq for NameCounts {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl fmt::Debug for NameCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameCounts")
    }
}
