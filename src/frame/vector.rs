//! Columnar vector storage for field values.
//!
//! Three capability tiers, each a trait:
//! - [`Vector`]: read-only indexed access plus bulk helpers.
//! - [`ReadWriteVector`]: adds `set`.
//! - [`MutableVector`]: adds `push` and `reverse`.
//!
//! [`FieldVector`] is the closed set of concrete vectors a field can hold:
//! an owned array, a constant, or a lazily computed binary operation over
//! two other vectors. Writing to a computed variant materializes it first.

use crate::frame::binary_op::BinaryOperation;
use crate::frame::error::{FrameError, FrameResult};
use crate::frame::value::Value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Read-only indexed sequence of values.
pub trait Vector {
    /// Number of values.
    fn len(&self) -> usize;

    /// Value at `index`, or `None` when out of bounds.
    fn get(&self, index: usize) -> Option<Value>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value at `index`. Computed vectors override this to skip
    /// building an intermediate [`Value`].
    #[inline]
    fn number(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_f64())
    }

    /// Iterate over all values in order.
    fn iter(&self) -> VectorIter<'_, Self>
    where
        Self: Sized,
    {
        VectorIter {
            vector: self,
            index: 0,
        }
    }

    /// Collect into an owned `Vec`.
    fn to_vec(&self) -> Vec<Value>
    where
        Self: Sized,
    {
        self.iter().collect()
    }

    /// Map every value (with its index) into a new `Vec`.
    fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        Self: Sized,
        F: FnMut(Value, usize) -> T,
    {
        self.iter().enumerate().map(|(i, v)| f(v, i)).collect()
    }

    /// Visit every value with its index.
    fn for_each<F>(&self, mut f: F)
    where
        Self: Sized,
        F: FnMut(Value, usize),
    {
        for (i, v) in self.iter().enumerate() {
            f(v, i);
        }
    }

    /// Keep the values for which `predicate` returns true.
    fn filter<F>(&self, mut predicate: F) -> Vec<Value>
    where
        Self: Sized,
        F: FnMut(&Value, usize) -> bool,
    {
        self.iter()
            .enumerate()
            .filter(|(i, v)| predicate(v, *i))
            .map(|(_, v)| v)
            .collect()
    }
}

/// A vector whose existing slots can be overwritten.
pub trait ReadWriteVector: Vector {
    fn set(&mut self, index: usize, value: Value) -> FrameResult<()>;
}

/// A vector that can grow and be reordered in place.
pub trait MutableVector: ReadWriteVector {
    fn push(&mut self, value: Value);
    fn reverse(&mut self);
}

/// Iterator over a [`Vector`].
pub struct VectorIter<'a, V: ?Sized> {
    vector: &'a V,
    index: usize,
}

impl<V: Vector + ?Sized> Iterator for VectorIter<'_, V> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let value = self.vector.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<V: Vector + ?Sized> ExactSizeIterator for VectorIter<'_, V> {}

// ── Owned array ──

/// Vector backed by an owned `Vec<Value>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayVector {
    values: Vec<Value>,
}

impl ArrayVector {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.values
    }
}

impl Vector for ArrayVector {
    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index).cloned()
    }

    #[inline]
    fn number(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(Value::as_f64)
    }
}

impl ReadWriteVector for ArrayVector {
    fn set(&mut self, index: usize, value: Value) -> FrameResult<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(FrameError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }
}

impl MutableVector for ArrayVector {
    fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    fn reverse(&mut self) {
        self.values.reverse();
    }
}

impl From<Vec<Value>> for ArrayVector {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

// ── Constant ──

/// The same value repeated `len` times.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantVector {
    value: Value,
    len: usize,
}

impl ConstantVector {
    pub fn new(value: Value, len: usize) -> Self {
        Self { value, len }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Vector for ConstantVector {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Value> {
        (index < self.len).then(|| self.value.clone())
    }

    #[inline]
    fn number(&self, index: usize) -> Option<f64> {
        if index < self.len {
            self.value.as_f64()
        } else {
            None
        }
    }
}

// ── Binary operation ──

/// Lazily computed `op(left[i], right[i])`.
///
/// Both operands must have the same length; this is checked once in
/// [`BinaryOperationVector::new`]. A row where either side is not numeric
/// yields [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperationVector {
    left: Arc<FieldVector>,
    right: Arc<FieldVector>,
    operation: BinaryOperation,
}

impl BinaryOperationVector {
    pub fn new(
        left: Arc<FieldVector>,
        right: Arc<FieldVector>,
        operation: BinaryOperation,
    ) -> FrameResult<Self> {
        if left.len() != right.len() {
            return Err(FrameError::VectorLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(Self {
            left,
            right,
            operation,
        })
    }

    pub fn operation(&self) -> BinaryOperation {
        self.operation
    }
}

impl Vector for BinaryOperationVector {
    #[inline]
    fn len(&self) -> usize {
        self.left.len()
    }

    fn get(&self, index: usize) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        Some(self.number(index).map_or(Value::Null, Value::Number))
    }

    #[inline]
    fn number(&self, index: usize) -> Option<f64> {
        let a = self.left.number(index)?;
        let b = self.right.number(index)?;
        Some(self.operation.apply(a, b))
    }
}

// ── Closed set ──

/// The vector variants a field can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldVector {
    Array(ArrayVector),
    Constant(ConstantVector),
    Binary(BinaryOperationVector),
}

impl FieldVector {
    pub fn array(values: Vec<Value>) -> Self {
        FieldVector::Array(ArrayVector::new(values))
    }

    pub fn constant(value: Value, len: usize) -> Self {
        FieldVector::Constant(ConstantVector::new(value, len))
    }

    pub fn binary(
        left: Arc<FieldVector>,
        right: Arc<FieldVector>,
        operation: BinaryOperation,
    ) -> FrameResult<Self> {
        BinaryOperationVector::new(left, right, operation).map(FieldVector::Binary)
    }

    /// Whether values are computed on read rather than stored.
    pub fn is_computed(&self) -> bool {
        !matches!(self, FieldVector::Array(_))
    }

    /// Replace a computed variant with an owned array of the same values.
    pub fn materialize(&mut self) -> &mut ArrayVector {
        if self.is_computed() {
            *self = FieldVector::Array(ArrayVector::new(self.to_vec()));
        }
        match self {
            FieldVector::Array(array) => array,
            _ => unreachable!("computed vector was materialized above"),
        }
    }

    /// Gather the values at `indices` into a new owned vector.
    pub fn take(&self, indices: &[usize]) -> FieldVector {
        FieldVector::array(
            indices
                .iter()
                .map(|&i| self.get(i).unwrap_or_default())
                .collect(),
        )
    }
}

impl Default for FieldVector {
    fn default() -> Self {
        FieldVector::Array(ArrayVector::default())
    }
}

impl Vector for FieldVector {
    #[inline]
    fn len(&self) -> usize {
        match self {
            FieldVector::Array(v) => v.len(),
            FieldVector::Constant(v) => v.len(),
            FieldVector::Binary(v) => v.len(),
        }
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Value> {
        match self {
            FieldVector::Array(v) => v.get(index),
            FieldVector::Constant(v) => v.get(index),
            FieldVector::Binary(v) => v.get(index),
        }
    }

    #[inline]
    fn number(&self, index: usize) -> Option<f64> {
        match self {
            FieldVector::Array(v) => v.number(index),
            FieldVector::Constant(v) => v.number(index),
            FieldVector::Binary(v) => v.number(index),
        }
    }
}

impl ReadWriteVector for FieldVector {
    fn set(&mut self, index: usize, value: Value) -> FrameResult<()> {
        self.materialize().set(index, value)
    }
}

impl MutableVector for FieldVector {
    fn push(&mut self, value: Value) {
        self.materialize().push(value);
    }

    fn reverse(&mut self) {
        self.materialize().reverse();
    }
}

impl From<Vec<Value>> for FieldVector {
    fn from(values: Vec<Value>) -> Self {
        FieldVector::array(values)
    }
}

impl FromIterator<Value> for FieldVector {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        FieldVector::array(iter.into_iter().collect())
    }
}

impl Serialize for FieldVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for FieldVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Value>::deserialize(deserializer).map(FieldVector::array)
    }
}
