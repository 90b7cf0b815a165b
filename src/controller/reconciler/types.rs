//! # Types
//!
//! Error and reason types for the reconciler.

use crate::constants::FINALIZE_RETRY_SECS;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Reason code recorded on a `NotReady` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Adapter construction, existence check or job creation failed
    CreateNewResourceFailed,
    /// Job update or finalizer persistence failed
    ResourceOperationFailed,
}

impl FailureReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::CreateNewResourceFailed => "CreateNewResourceFailed",
            FailureReason::ResourceOperationFailed => "ResourceOperationFailed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReconcilerError {
    /// Reading the `GlueJob` failed for a reason other than absence
    #[error("Failed to get GlueJob: {0:#}")]
    Fetch(anyhow::Error),
    /// An adapter or finalizer step failed and was recorded as `NotReady`
    #[error("{reason}: {source:#}")]
    Operation {
        reason: FailureReason,
        source: anyhow::Error,
    },
    /// Deleting the Glue job failed; the finalizer stays in place
    #[error("Failed to finalize GlueJob: {0:#}")]
    Finalize(anyhow::Error),
    /// Writing status or finalizers back to the API server failed
    #[error("Failed to persist GlueJob: {0:#}")]
    Persist(anyhow::Error),
    /// Several failures from one pass, originating error first
    #[error("{}", join_errors(.0))]
    Aggregate(Vec<ReconcilerError>),
}

impl ReconcilerError {
    /// Fixed requeue delay, when the failure calls for one instead of backoff
    #[must_use]
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            ReconcilerError::Finalize(_) => Some(Duration::from_secs(FINALIZE_RETRY_SECS)),
            _ => None,
        }
    }

    /// Flattened list of underlying errors
    #[must_use]
    pub fn errors(&self) -> Vec<&ReconcilerError> {
        match self {
            ReconcilerError::Aggregate(errors) => {
                errors.iter().flat_map(ReconcilerError::errors).collect()
            }
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[ReconcilerError]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("[{}]", messages.join(", "))
}
