//! Scenario error types.

use strata_session::SessionError;
use thiserror::Error;

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors reported by the scenario runner.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("setup failed: {0}")]
    Setup(#[from] SessionError),

    #[error("step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    #[error("step '{step}' succeeded but {expected} was expected")]
    UnexpectedSuccess { step: String, expected: String },

    #[error("step '{step}': expected {expected}, got {actual}")]
    Mismatch {
        step: String,
        expected: String,
        actual: String,
    },
}

impl ScenarioError {
    pub fn step_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StepFailed {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn unexpected_success(step: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnexpectedSuccess {
            step: step.into(),
            expected: expected.into(),
        }
    }

    pub fn mismatch(
        step: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
