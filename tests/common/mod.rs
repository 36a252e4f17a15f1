//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use frameflow::frame::{DataFrame, Vector};

/// Install a tracing subscriber once, honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Field names of a frame, in order
pub fn field_names(frame: &DataFrame) -> Vec<String> {
    frame.fields().iter().map(|f| f.name.clone()).collect()
}

/// Numeric values of a named field
pub fn numbers(frame: &DataFrame, name: &str) -> Vec<Option<f64>> {
    let field = frame
        .field(name)
        .unwrap_or_else(|| panic!("field {} not found", name));
    (0..field.len()).map(|i| field.values.number(i)).collect()
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
