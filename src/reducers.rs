//! Field reducers: collapse a field's values into a single value.
//!
//! Used by the `reduce` transformer and by `calculateField` in row mode.
//! Numeric reducers skip nulls and values with no numeric reading.

use crate::frame::{Field, Value, Vector};
use crate::registry::{Registry, RegistryItem};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Built-in reducer ids.
pub mod reducer_id {
    pub const SUM: &str = "sum";
    pub const MAX: &str = "max";
    pub const MIN: &str = "min";
    pub const MEAN: &str = "mean";
    pub const RANGE: &str = "range";
    pub const FIRST: &str = "first";
    pub const FIRST_NOT_NULL: &str = "firstNotNull";
    pub const LAST: &str = "last";
    pub const LAST_NOT_NULL: &str = "lastNotNull";
    pub const COUNT: &str = "count";
    pub const DELTA: &str = "delta";
    pub const DISTINCT_COUNT: &str = "distinctCount";
    pub const ALL_IS_NULL: &str = "allIsNull";
}

type ReduceFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A registry entry describing one reducer.
pub struct FieldReducerInfo {
    id: String,
    name: String,
    description: String,
    aliases: &'static [&'static str],
    reduce: Arc<ReduceFn>,
}

impl FieldReducerInfo {
    pub fn new<F>(id: impl Into<String>, name: impl Into<String>, reduce: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            aliases: &[],
            reduce: Arc::new(reduce),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Reduce a slice of values.
    pub fn reduce_values(&self, values: &[Value]) -> Value {
        (self.reduce)(values)
    }

    /// Reduce a field's values.
    pub fn reduce(&self, field: &Field) -> Value {
        let values = field.values.to_vec();
        self.reduce_values(&values)
    }
}

impl RegistryItem for FieldReducerInfo {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn aliases(&self) -> &[&'static str] {
        self.aliases
    }
}

impl fmt::Debug for FieldReducerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldReducerInfo")
            .field("id", &self.id)
            .finish()
    }
}

fn numbers(values: &[Value]) -> impl Iterator<Item = f64> + '_ {
    values
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| !v.is_nan())
}

fn number_or_null(v: Option<f64>) -> Value {
    v.map_or(Value::Null, Value::Number)
}

fn max(values: &[Value]) -> Option<f64> {
    numbers(values).reduce(f64::max)
}

fn min(values: &[Value]) -> Option<f64> {
    numbers(values).reduce(f64::min)
}

/// Sum of increases, treating a drop as a counter reset.
fn delta(values: &[Value]) -> f64 {
    let mut total = 0.0;
    let mut previous: Option<f64> = None;
    for current in numbers(values) {
        if let Some(prev) = previous {
            if current >= prev {
                total += current - prev;
            } else {
                total += current;
            }
        }
        previous = Some(current);
    }
    total
}

fn distinct_count(values: &[Value]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(Value::sort_cmp);
    sorted.dedup_by(|a, b| a.sort_cmp(b) == Ordering::Equal);
    sorted.len()
}

/// All built-in reducers.
pub fn standard_reducers() -> Registry<FieldReducerInfo> {
    use reducer_id as id;

    let entries = vec![
        FieldReducerInfo::new(id::SUM, "Total", |v| Value::Number(numbers(v).sum()))
            .with_description("The sum of all values")
            .with_aliases(&["total"]),
        FieldReducerInfo::new(id::MAX, "Max", |v| number_or_null(max(v)))
            .with_description("Maximum value"),
        FieldReducerInfo::new(id::MIN, "Min", |v| number_or_null(min(v)))
            .with_description("Minimum value"),
        FieldReducerInfo::new(id::MEAN, "Mean", |v| {
            let (sum, count) = numbers(v).fold((0.0, 0usize), |(s, c), n| (s + n, c + 1));
            if count == 0 {
                Value::Null
            } else {
                Value::Number(sum / count as f64)
            }
        })
        .with_description("Average value")
        .with_aliases(&["avg"]),
        FieldReducerInfo::new(id::RANGE, "Range", |v| match (max(v), min(v)) {
            (Some(hi), Some(lo)) => Value::Number(hi - lo),
            _ => Value::Null,
        })
        .with_description("Difference between maximum and minimum values"),
        FieldReducerInfo::new(id::FIRST, "First", |v| v.first().cloned().unwrap_or_default())
            .with_description("First value"),
        FieldReducerInfo::new(id::FIRST_NOT_NULL, "First *", |v| {
            v.iter().find(|x| !x.is_null()).cloned().unwrap_or_default()
        })
        .with_description("First non-null value"),
        FieldReducerInfo::new(id::LAST, "Last", |v| v.last().cloned().unwrap_or_default())
            .with_description("Last value"),
        FieldReducerInfo::new(id::LAST_NOT_NULL, "Last *", |v| {
            v.iter().rev().find(|x| !x.is_null()).cloned().unwrap_or_default()
        })
        .with_description("Last non-null value")
        .with_aliases(&["current"]),
        FieldReducerInfo::new(id::COUNT, "Count", |v| Value::Number(v.len() as f64))
            .with_description("Number of values"),
        FieldReducerInfo::new(id::DELTA, "Delta", |v| Value::Number(delta(v)))
            .with_description("Cumulative change in value, counter resets count as increases"),
        FieldReducerInfo::new(id::DISTINCT_COUNT, "Distinct Count", |v| {
            Value::Number(distinct_count(v) as f64)
        })
        .with_description("Number of distinct values"),
        FieldReducerInfo::new(id::ALL_IS_NULL, "All Nulls", |v| {
            Value::Bool(v.iter().all(Value::is_null))
        })
        .with_description("True when all values are null"),
    ];

    Registry::from_builtins(entries.into_iter().map(Arc::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(id: &str, values: Vec<Value>) -> Value {
        let registry = standard_reducers();
        registry.get(id).unwrap().reduce_values(&values)
    }

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::Number).collect()
    }

    #[test]
    fn test_numeric_reducers() {
        let values = nums(&[3.0, 1.0, 4.0, 1.0, 5.0]);
        assert_eq!(reduce(reducer_id::SUM, values.clone()), Value::Number(14.0));
        assert_eq!(reduce(reducer_id::MAX, values.clone()), Value::Number(5.0));
        assert_eq!(reduce(reducer_id::MIN, values.clone()), Value::Number(1.0));
        assert_eq!(reduce(reducer_id::MEAN, values.clone()), Value::Number(2.8));
        assert_eq!(reduce(reducer_id::RANGE, values.clone()), Value::Number(4.0));
        assert_eq!(reduce(reducer_id::COUNT, values.clone()), Value::Number(5.0));
        assert_eq!(reduce(reducer_id::DISTINCT_COUNT, values), Value::Number(4.0));
    }

    #[test]
    fn test_nulls_are_skipped_by_numeric_reducers() {
        let values = vec![Value::Null, Value::Number(2.0), Value::Null, Value::Number(4.0)];
        assert_eq!(reduce(reducer_id::MEAN, values.clone()), Value::Number(3.0));
        assert_eq!(reduce(reducer_id::FIRST, values.clone()), Value::Null);
        assert_eq!(reduce(reducer_id::FIRST_NOT_NULL, values.clone()), Value::Number(2.0));
        assert_eq!(reduce(reducer_id::LAST_NOT_NULL, values.clone()), Value::Number(4.0));
        assert_eq!(reduce(reducer_id::COUNT, values), Value::Number(4.0));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reduce(reducer_id::SUM, vec![]), Value::Number(0.0));
        assert_eq!(reduce(reducer_id::MAX, vec![]), Value::Null);
        assert_eq!(reduce(reducer_id::MEAN, vec![]), Value::Null);
        assert_eq!(reduce(reducer_id::ALL_IS_NULL, vec![]), Value::Bool(true));
    }

    #[test]
    fn test_delta_handles_counter_reset() {
        let values = nums(&[1.0, 5.0, 2.0, 4.0]);
        // +4, reset to 2 counts as +2, then +2.
        assert_eq!(reduce(reducer_id::DELTA, values), Value::Number(8.0));
    }

    #[test]
    fn test_aliases() {
        let registry = standard_reducers();
        assert_eq!(registry.get("avg").unwrap().id(), reducer_id::MEAN);
        assert_eq!(registry.get("current").unwrap().id(), reducer_id::LAST_NOT_NULL);
    }

    #[test]
    fn test_reduce_field() {
        let registry = standard_reducers();
        let field = Field::number("v", [1.0, 2.0]);
        assert_eq!(registry.get(reducer_id::LAST).unwrap().reduce(&field), Value::Number(2.0));
    }
}
