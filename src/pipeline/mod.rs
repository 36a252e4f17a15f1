//! Transformation pipeline over data frames.
//!
//! An ordered list of [`TransformerConfig`]s is compiled against a
//! [`Catalog`](crate::registry::Catalog) snapshot into a [`CompiledPlan`],
//! which is then executed over the incoming frames.
//!
//! # Architecture
//!
//! ```text
//! [TransformerConfig]* ──► PipelineCompiler ──► CompiledPlan ──► execute(frames) ──► PipelineOutput
//!                               │
//!                               └── Catalog: transformers, matchers, reducers
//! ```
//!
//! # Design
//!
//! - **Prepare once**: options are parsed and matchers resolved when the
//!   plan is compiled, so execution only evaluates closures.
//! - **Enum dispatch for built-ins**: `BuiltinTransformer`; plugins go
//!   through the `TransformerPlugin` trait.
//! - **Fail closed per step**: an unknown id, bad options or a runtime
//!   error skips only that step unless [`ErrorPolicy::Fail`] is set.

pub mod compiled_plan;
pub mod compiler;
pub mod error;
pub mod transformer;
pub mod transformer_id;
pub mod transformers;

pub use compiled_plan::{
    CompiledPlan, CompiledStep, ErrorPolicy, PipelineOutput, PlanStats, SkipReason, SkippedStep,
    StepFailure,
};
pub use compiler::{transform_frames, PipelineCompiler};
pub use error::{TransformError, TransformResult};
pub use transformer::{
    passthrough, AnyTransformer, BuiltinTransformer, FrameOperator, TransformContext,
    TransformerConfig, TransformerPlugin,
};
pub use transformer_id::TransformerId;
