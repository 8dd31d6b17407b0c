//! Pipeline error types

use crate::validator::FieldError;
use ekmyth_store::StoreError;
use thiserror::Error;

/// Errors that can occur while moving a submission through the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The draft failed validation
    #[error("Invalid draft: {}", join_errors(.0))]
    Validation(Vec<FieldError>),

    /// The operation is not allowed in the submission's current state
    #[error("Cannot {action} while submission is {state}")]
    InvalidState {
        /// Attempted operation
        action: &'static str,
        /// Current state name
        state: &'static str,
    },

    /// The store rejected the new record
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
