//! Built-in transformers.

mod calculate_field;
mod filter_by_name;
mod filter_by_ref_id;
mod filter_by_value;
mod filter_fields;
mod limit;
mod noop;
mod organize;
mod reduce;
mod sort_by;

pub use calculate_field::{
    BinaryOptions, CalculateFieldMode, CalculateFieldOptions, CalculateFieldTransformer,
    ReduceRowOptions,
};
pub use filter_by_name::{FilterFieldsByNameOptions, FilterFieldsByNameTransformer, NameFilter};
pub use filter_by_ref_id::{FilterByRefIdOptions, FilterByRefIdTransformer};
pub use filter_by_value::{
    FilterByValueMatch, FilterByValueOptions, FilterByValueTransformer, FilterByValueType,
    ValueFilter,
};
pub use filter_fields::{filter_fields, FilterFieldsOptions, FilterFieldsTransformer};
pub use limit::{LimitOptions, LimitTransformer};
pub use noop::NoopTransformer;
pub use organize::{OrganizeOptions, OrganizeTransformer};
pub use reduce::{ReduceMode, ReduceOptions, ReduceTransformer};
pub use sort_by::{SortByField, SortByOptions, SortByTransformer};
