//! # Reconcile Planning
//!
//! Pure decisions of the reconcile state machine. Nothing here performs I/O;
//! the reconciler applies the chosen step and persists the outcome.
//!
//! ```text
//! fetched ── deletion marked ── finalizer present ──► Finalize
//!    │                       └─ finalizer absent  ──► Skip
//!    └────── active ── job exists ────────────────► Update
//!                   └─ job missing ───────────────► Create
//! ```

use crate::constants::REASON_SUCCESS;
use crate::controller::reconciler::finalizer::has_finalizer;
use crate::controller::reconciler::types::FailureReason;
use crate::crd::{Condition, ConditionType, GlueJob};

/// Next action for a fetched `GlueJob`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    /// Deletion marked and our finalizer already gone
    Skip,
    /// Delete the external job, then drop the finalizer
    Finalize,
    Create,
    Update,
}

impl ReconcileStep {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileStep::Skip => "skip",
            ReconcileStep::Finalize => "finalize",
            ReconcileStep::Create => "create",
            ReconcileStep::Update => "update",
        }
    }
}

#[must_use]
pub fn is_marked_for_deletion(job: &GlueJob) -> bool {
    job.metadata.deletion_timestamp.is_some()
}

/// Whether the step for `job` needs a connected adapter at all
#[must_use]
pub fn requires_adapter(job: &GlueJob) -> bool {
    !is_marked_for_deletion(job) || has_finalizer(job)
}

/// Choose the step for `job` given the observed existence of its Glue job
#[must_use]
pub fn plan_step(job: &GlueJob, exists: bool) -> ReconcileStep {
    match (is_marked_for_deletion(job), has_finalizer(job), exists) {
        (true, true, _) => ReconcileStep::Finalize,
        (true, false, _) => ReconcileStep::Skip,
        (false, _, true) => ReconcileStep::Update,
        (false, _, false) => ReconcileStep::Create,
    }
}

/// Ready condition for a completed create or update, `None` for other steps
#[must_use]
pub fn success_condition(step: ReconcileStep) -> Option<Condition> {
    let message = match step {
        ReconcileStep::Create => "Successfully created GlueJob",
        ReconcileStep::Update => "Successfully updated GlueJob",
        ReconcileStep::Skip | ReconcileStep::Finalize => return None,
    };
    Some(Condition::new(ConditionType::Ready, REASON_SUCCESS, message))
}

/// Reason recorded when `step` fails
#[must_use]
pub fn failure_reason(step: ReconcileStep) -> FailureReason {
    match step {
        ReconcileStep::Create => FailureReason::CreateNewResourceFailed,
        _ => FailureReason::ResourceOperationFailed,
    }
}

/// `NotReady` condition carrying the underlying error text
#[must_use]
pub fn failure_condition(reason: FailureReason, error: &anyhow::Error) -> Condition {
    Condition::new(ConditionType::NotReady, reason.as_str(), format!("{error:#}"))
}
