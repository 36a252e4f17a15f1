use crate::frame::DataFrame;
use crate::pipeline::error::{TransformError, TransformResult};
use crate::pipeline::transformer::FrameOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when a step cannot be prepared or fails while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log, record the failure, and hand the step's input to the next step.
    #[default]
    Passthrough,
    /// Stop at the first failing step and return its error.
    Fail,
}

/// A prepared step of the plan.
pub struct CompiledStep {
    /// Position of the step's config in the original config list.
    pub index: usize,
    pub id: String,
    pub(crate) operator: FrameOperator,
}

impl fmt::Debug for CompiledStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledStep")
            .field("index", &self.index)
            .field("id", &self.id)
            .finish()
    }
}

/// Why a configured step is not part of the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Disabled,
    Error(TransformError),
}

/// A configured step left out of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStep {
    pub index: usize,
    pub id: String,
    pub reason: SkipReason,
}

/// A step that failed, either while preparing or while running.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub index: usize,
    pub id: String,
    pub error: TransformError,
}

/// Frames produced by a run, plus the steps that were passed through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub frames: Vec<DataFrame>,
    pub failures: Vec<StepFailure>,
}

impl PipelineOutput {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compiled execution plan for a list of transformer configs.
/// Contains only the steps that will run, in config order.
#[derive(Debug, Default)]
pub struct CompiledPlan {
    /// Prepared steps in execution order
    pub steps: Vec<CompiledStep>,

    /// Configured steps that will not run
    pub skipped: Vec<SkippedStep>,

    /// Compilation statistics
    pub stats: PlanStats,

    /// Failure handling for compile-time and run-time errors
    pub policy: ErrorPolicy,
}

/// Statistics about the compiled plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Number of configs given to the compiler
    pub total_steps: usize,

    /// Number of steps in the execution plan
    pub active_steps: usize,

    /// Number of configs marked disabled
    pub disabled_steps: usize,

    /// Number of configs that could not be prepared
    pub failed_steps: usize,

    /// Compilation time in microseconds
    pub compile_time_us: u64,
}

impl CompiledPlan {
    /// Create a new empty compiled plan
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check if the plan has any steps to run
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Compile-time failures, in config order.
    pub fn errors(&self) -> impl Iterator<Item = StepFailure> + '_ {
        self.skipped.iter().filter_map(|skip| match &skip.reason {
            SkipReason::Error(error) => Some(StepFailure {
                index: skip.index,
                id: skip.id.clone(),
                error: error.clone(),
            }),
            SkipReason::Disabled => None,
        })
    }

    /// Run every step in order over `frames`.
    ///
    /// Under [`ErrorPolicy::Passthrough`], a failing step is recorded in
    /// [`PipelineOutput::failures`] and its input flows on unchanged. Under
    /// [`ErrorPolicy::Fail`], the first failure (including steps that failed
    /// to compile) is returned as [`TransformError::StepFailed`].
    pub fn execute(&self, frames: Vec<DataFrame>) -> TransformResult<PipelineOutput> {
        let mut failures: Vec<StepFailure> = self.errors().collect();
        if self.policy == ErrorPolicy::Fail {
            if let Some(failure) = failures.into_iter().next() {
                return Err(failure.into_error());
            }
            failures = Vec::new();
        }

        let mut frames = frames;
        for step in &self.steps {
            match (step.operator)(&frames) {
                Ok(next) => {
                    tracing::trace!(
                        "Step {} ({}) produced {} frame(s)",
                        step.index,
                        step.id,
                        next.len()
                    );
                    frames = next;
                }
                Err(error) => {
                    let failure = StepFailure {
                        index: step.index,
                        id: step.id.clone(),
                        error,
                    };
                    if self.policy == ErrorPolicy::Fail {
                        return Err(failure.into_error());
                    }
                    tracing::warn!(
                        "Transformer {} ({}) failed, passing input through: {}",
                        step.index,
                        step.id,
                        failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        failures.sort_by_key(|f| f.index);
        Ok(PipelineOutput { frames, failures })
    }
}

impl StepFailure {
    fn into_error(self) -> TransformError {
        TransformError::StepFailed {
            index: self.index,
            id: self.id,
            source: Box::new(self.error),
        }
    }
}
