//! # Condition Reporter
//!
//! Appends status conditions to a `GlueJob` and persists the status sub-resource.

use crate::controller::reconciler::store::GlueJobStore;
use crate::crd::{Condition, GlueJob};
use anyhow::Result;

/// Append `condition` to the object's condition log
///
/// Existing entries are never touched.
pub fn append_condition(job: &mut GlueJob, condition: Condition) {
    job.status
        .get_or_insert_with(Default::default)
        .conditions
        .push(condition);
}

/// Append `condition` and persist the status
///
/// On success `job` is replaced by the object returned from the API server.
///
/// # Errors
///
/// Returns the persistence error; the condition stays appended locally.
pub async fn report(store: &dyn GlueJobStore, job: &mut GlueJob, condition: Condition) -> Result<()> {
    append_condition(job, condition);
    *job = store.update_status(job).await?;
    Ok(())
}
