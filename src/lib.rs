//! # frameflow: data frame transformation pipeline
//!
//! Reshapes columnar query results ("data frames") before they are
//! visualized. A panel's ordered list of transformer configs is compiled
//! against a catalog of matchers, transformers and reducers, then run over
//! the frames returned by a data source.
//!
//! ## Architecture
//!
//! - **Frame model**: [`DataFrame`]s of typed [`Field`]s, backed by owned or
//!   computed vectors
//! - **Matchers**: field, value and frame predicates selected by id and
//!   configured with JSON options
//! - **Pipeline**: transformers prepared once per compile, then executed in
//!   order; a failing step passes its input through
//! - **Registry**: id-keyed catalogs, and a reactive registry that folds plugin
//!   contributions into immutable snapshots
//! - **URL params**: the query-string codec used to carry filter state in links
//!
//! ## Configuration
//!
//! Transformation lists are stored as JSON or TOML [`PipelineConfig`] files,
//! chosen by extension.
//!
//! ## Example
//!
//! ```ignore
//! use frameflow::{Catalog, DataFrame, Field, PipelineCompiler, TransformerConfig};
//! use serde_json::json;
//!
//! let frames = vec![DataFrame::new(vec![
//!     Field::time("time", [1, 2, 3]),
//!     Field::number("cpu", [0.4, 0.9, 0.2]),
//!     Field::string("host", ["a", "b", "c"]),
//! ])?];
//!
//! let configs = [
//!     TransformerConfig::new("filterFields", json!({ "include": { "id": "numeric" } })),
//!     TransformerConfig::new("limit", json!({ "limitField": 2 })),
//! ];
//!
//! let catalog = Catalog::standard();
//! let output = PipelineCompiler::compile(&configs, &catalog).execute(frames)?;
//! assert_eq!(output.frames[0].field_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod matchers;
pub mod pipeline;
pub mod reducers;
pub mod registry;
pub mod url_params;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{FrameflowError, Result, ResultExt};
pub use frame::{DataFrame, Field, FieldType, Value};
pub use matchers::{FieldMatcher, MatcherConfig, ValueMatcher};
pub use pipeline::{
    transform_frames, CompiledPlan, ErrorPolicy, PipelineCompiler, PipelineOutput,
    TransformerConfig,
};
pub use registry::{Catalog, CatalogRegistry, Contribution};
pub use url_params::{parse_key_value, to_url_params, QueryParams, QueryValue};
