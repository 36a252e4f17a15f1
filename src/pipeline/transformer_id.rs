//! Built-in transformer identifiers.
//!
//! The serialized form of each variant is the id stored in saved configs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ids of the transformers shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformerId {
    Noop,
    FilterFields,
    FilterFieldsByName,
    FilterByRefId,
    FilterByValue,
    Organize,
    CalculateField,
    Reduce,
    SortBy,
    Limit,
}

impl TransformerId {
    /// The id used in saved configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformerId::Noop => "noop",
            TransformerId::FilterFields => "filterFields",
            TransformerId::FilterFieldsByName => "filterFieldsByName",
            TransformerId::FilterByRefId => "filterByRefId",
            TransformerId::FilterByValue => "filterByValue",
            TransformerId::Organize => "organize",
            TransformerId::CalculateField => "calculateField",
            TransformerId::Reduce => "reduce",
            TransformerId::SortBy => "sortBy",
            TransformerId::Limit => "limit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TransformerId::Noop => "noop",
            TransformerId::FilterFields => "Filter by field",
            TransformerId::FilterFieldsByName => "Filter by name",
            TransformerId::FilterByRefId => "Filter data by query",
            TransformerId::FilterByValue => "Filter data by values",
            TransformerId::Organize => "Organize fields",
            TransformerId::CalculateField => "Add field from calculation",
            TransformerId::Reduce => "Reduce",
            TransformerId::SortBy => "Sort by",
            TransformerId::Limit => "Limit",
        }
    }

    /// All built-in transformers, in registration order.
    pub fn all() -> &'static [TransformerId] {
        &[
            TransformerId::Noop,
            TransformerId::FilterFields,
            TransformerId::FilterFieldsByName,
            TransformerId::FilterByRefId,
            TransformerId::FilterByValue,
            TransformerId::Organize,
            TransformerId::CalculateField,
            TransformerId::Reduce,
            TransformerId::SortBy,
            TransformerId::Limit,
        ]
    }

    /// Transformers that exist for internal composition and are hidden
    /// from pickers.
    pub fn is_internal(&self) -> bool {
        matches!(self, TransformerId::Noop | TransformerId::FilterFields)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TransformerId::Noop => "Return the input unchanged.",
            TransformerId::FilterFields => {
                "Keep fields selected by a field matcher.\n\
                 An exclude matcher removes fields instead."
            }
            TransformerId::FilterFieldsByName => {
                "Keep or remove fields by display name.\n\
                 Names can be listed or matched by pattern."
            }
            TransformerId::FilterByRefId => "Keep only frames returned by matching queries.",
            TransformerId::FilterByValue => {
                "Keep or remove rows whose values satisfy conditions.\n\
                 Conditions combine with any or all."
            }
            TransformerId::Organize => "Reorder, hide or rename fields.",
            TransformerId::CalculateField => {
                "Add a field computed from other fields.\n\
                 Binary mode combines two fields or constants.\n\
                 Row mode reduces each row across fields."
            }
            TransformerId::Reduce => {
                "Reduce each field to single values.\n\
                 Produces one row per field, or one value per reducer."
            }
            TransformerId::SortBy => "Sort rows by one or more fields.",
            TransformerId::Limit => "Keep only the first rows of each frame.",
        }
    }
}

impl FromStr for TransformerId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformerId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for TransformerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for id in TransformerId::all() {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            assert_eq!(id.as_str().parse::<TransformerId>(), Ok(*id));
        }
    }

    #[test]
    fn test_unknown_id() {
        assert!("pivot".parse::<TransformerId>().is_err());
    }
}
