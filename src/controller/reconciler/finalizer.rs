//! # Finalizer Manager
//!
//! Adds and removes the controller's finalizer token on a `GlueJob`.

use crate::constants::GLUE_JOB_FINALIZER;
use crate::controller::reconciler::store::GlueJobStore;
use crate::crd::GlueJob;
use anyhow::Result;
use kube::ResourceExt;
use tracing::debug;

#[must_use]
pub fn has_finalizer(job: &GlueJob) -> bool {
    job.finalizers().iter().any(|f| f == GLUE_JOB_FINALIZER)
}

/// Finalizer list with the token present or absent, `None` when unchanged
#[must_use]
pub fn desired_finalizers(job: &GlueJob, present: bool) -> Option<Vec<String>> {
    if has_finalizer(job) == present {
        return None;
    }

    let mut finalizers: Vec<String> = job
        .finalizers()
        .iter()
        .filter(|f| f.as_str() != GLUE_JOB_FINALIZER)
        .cloned()
        .collect();
    if present {
        finalizers.push(GLUE_JOB_FINALIZER.to_string());
    }
    Some(finalizers)
}

/// Make the finalizer token present or absent, persisting only on change
///
/// Returns whether a write was issued.
///
/// # Errors
///
/// Returns the persistence error; `job` then keeps the requested finalizers locally.
pub async fn set_finalizer(store: &dyn GlueJobStore, job: &mut GlueJob, present: bool) -> Result<bool> {
    let Some(finalizers) = desired_finalizers(job, present) else {
        return Ok(false);
    };

    debug!(
        job = %job.name_any(),
        present,
        "Updating GlueJob finalizers"
    );
    job.metadata.finalizers = Some(finalizers);
    *job = store.update_finalizers(job).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_with(finalizers: &[&str]) -> GlueJob {
        let mut job: GlueJob = serde_json::from_value(serde_json::json!({
            "apiVersion": "aws.90poe.io/v1alpha1",
            "kind": "GlueJob",
            "metadata": {"name": "etl-1", "namespace": "data"},
            "spec": {
                "name": "etl-1",
                "command": {"name": "glueetl", "scriptLocation": "s3://b/k.py"},
                "role": "arn:aws:iam::123:role/r"
            }
        }))
        .unwrap();
        job.metadata.finalizers = Some(finalizers.iter().map(ToString::to_string).collect());
        job
    }

    #[test]
    fn test_adding_when_present_is_unchanged() {
        let job = job_with(&[GLUE_JOB_FINALIZER]);
        assert_eq!(desired_finalizers(&job, true), None);
    }

    #[test]
    fn test_removing_when_absent_is_unchanged() {
        let job = job_with(&["other.io/finalizer"]);
        assert_eq!(desired_finalizers(&job, false), None);
    }

    #[test]
    fn test_add_keeps_foreign_finalizers() {
        let job = job_with(&["other.io/finalizer"]);
        assert_eq!(
            desired_finalizers(&job, true),
            Some(vec![
                "other.io/finalizer".to_string(),
                GLUE_JOB_FINALIZER.to_string()
            ])
        );
    }

    #[test]
    fn test_remove_keeps_foreign_finalizers() {
        let job = job_with(&[GLUE_JOB_FINALIZER, "other.io/finalizer"]);
        assert_eq!(
            desired_finalizers(&job, false),
            Some(vec!["other.io/finalizer".to_string()])
        );
    }
}
