//! Test data builders for creating test frames

use frameflow::frame::{DataFrame, Field};

/// Builder for creating test DataFrames
#[derive(Default)]
pub struct FrameBuilder {
    name: Option<String>,
    ref_id: Option<String>,
    fields: Vec<Field>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn ref_id(mut self, ref_id: &str) -> Self {
        self.ref_id = Some(ref_id.to_string());
        self
    }

    pub fn time(self, name: &str, values: &[i64]) -> Self {
        self.field(Field::time(name, values.iter().copied()))
    }

    pub fn number(self, name: &str, values: &[f64]) -> Self {
        self.field(Field::number(name, values.iter().copied()))
    }

    pub fn string(self, name: &str, values: &[&str]) -> Self {
        self.field(Field::string(name, values.iter().copied()))
    }

    pub fn boolean(self, name: &str, values: &[bool]) -> Self {
        self.field(Field::boolean(name, values.iter().copied()))
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> DataFrame {
        let mut frame = DataFrame::new(self.fields).expect("test fields must share a length");
        frame.name = self.name;
        frame.ref_id = self.ref_id;
        frame
    }
}

/// A frame with one field of each common type: time, boolean, string, number.
pub fn mixed_frame() -> DataFrame {
    FrameBuilder::new()
        .ref_id("A")
        .time("time", &[1000, 2000, 3000])
        .boolean("up", &[true, false, true])
        .string("host", &["a", "b", "c"])
        .number("cpu", &[0.5, 0.75, 0.25])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_builder() {
        let frame = FrameBuilder::new()
            .name("cpu")
            .ref_id("B")
            .number("value", &[1.0, 2.0])
            .build();

        assert_eq!(frame.name.as_deref(), Some("cpu"));
        assert_eq!(frame.ref_id.as_deref(), Some("B"));
        assert_eq!(frame.length(), 2);
    }
}
