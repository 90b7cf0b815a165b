//! # Error Policy
//!
//! Requeue decisions for failed reconciliations and logging of controller
//! stream errors.

use crate::controller::reconciler::{ObjectKey, Reconciler, ReconcilerError};
use crate::crd::GlueJob;
use crate::observability;
use kube_runtime::controller::{self, Action};
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Handle reconciliation errors
///
/// Finalize failures retry after a fixed delay. Every other failure backs off
/// exponentially per object; the backoff is reset by the next success.
pub fn handle_reconciliation_error(
    obj: Arc<GlueJob>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let key = ObjectKey::for_job(&obj);

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = key.name.as_str(),
        resource.namespace = key.namespace.as_str(),
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}: {}", key, error);
    observability::metrics::increment_reconciliation_errors();

    if let Some(delay) = error.requeue_after() {
        info!(
            "Retrying finalization of {} in {}s (trigger source: finalize-retry)",
            key,
            delay.as_secs()
        );
        observability::metrics::increment_requeues_total("finalize-retry");
        return Action::requeue(delay);
    }

    let delay = ctx.next_error_backoff(&key);
    info!(
        "Retrying {} with exponential backoff: {}ms (trigger source: error-backoff)",
        key,
        delay.as_millis()
    );
    observability::metrics::increment_requeues_total("error-backoff");
    Action::requeue(delay)
}

/// Log an error item from the controller output stream
///
/// Reconcile failures were already handled by [`handle_reconciliation_error`];
/// watch failures are retried by the watcher's own backoff.
pub fn handle_controller_error(error: &controller::Error<ReconcilerError, watcher::Error>) {
    match error {
        controller::Error::ReconcilerFailed(_, obj_ref) => {
            debug!("Reconcile of {} failed and was requeued", obj_ref);
        }
        controller::Error::ObjectNotFound(obj_ref) => {
            debug!("{} no longer in the cache, skipping", obj_ref);
        }
        controller::Error::QueueError(watch_error) => {
            warn!(error = %watch_error, "watch.error");
        }
        other => {
            error!("Controller stream error: {}", other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::controller::reconciler::{FailureReason, GlueJobStore};
    use crate::crd::GlueJobSpec;
    use crate::provider::{GlueJobOperations, GlueJobProvider};
    use crate::controller::reconciler::ReconcileContext;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::time::Duration;

    struct Unused;

    #[async_trait]
    impl GlueJobStore for Unused {
        async fn get(&self, _key: &ObjectKey) -> Result<Option<GlueJob>> {
            Ok(None)
        }
        async fn update_finalizers(&self, job: &GlueJob) -> Result<GlueJob> {
            Ok(job.clone())
        }
        async fn update_status(&self, job: &GlueJob) -> Result<GlueJob> {
            Ok(job.clone())
        }
    }

    #[async_trait]
    impl GlueJobProvider for Unused {
        async fn connect(
            &self,
            _ctx: &ReconcileContext,
            _spec: &GlueJobSpec,
        ) -> Result<Box<dyn GlueJobOperations>> {
            Err(anyhow!("not connected"))
        }
    }

    fn reconciler() -> Arc<Reconciler> {
        let config = ControllerConfig {
            backoff_start_ms: 1_000,
            backoff_max_ms: 4_000,
            ..ControllerConfig::default()
        };
        Arc::new(Reconciler::new(Arc::new(Unused), Arc::new(Unused), config))
    }

    fn job() -> Arc<GlueJob> {
        Arc::new(
            serde_json::from_value(serde_json::json!({
                "apiVersion": "aws.90poe.io/v1alpha1",
                "kind": "GlueJob",
                "metadata": {"name": "etl-1", "namespace": "data"},
                "spec": {
                    "name": "etl-1",
                    "command": {"name": "glueetl", "scriptLocation": "s3://b/k.py"},
                    "role": "arn:aws:iam::123:role/r"
                }
            }))
            .unwrap(),
        )
    }

    fn operation_error() -> ReconcilerError {
        ReconcilerError::Operation {
            reason: FailureReason::ResourceOperationFailed,
            source: anyhow!("update rejected"),
        }
    }

    #[test]
    fn test_finalize_failure_requeues_after_five_seconds() {
        let action = handle_reconciliation_error(
            job(),
            &ReconcilerError::Finalize(anyhow!("throttled")),
            reconciler(),
        );
        assert_eq!(action, Action::requeue(Duration::from_secs(5)));
    }

    #[test]
    fn test_other_failures_back_off_per_object() {
        let ctx = reconciler();
        let delays: Vec<Action> = (0..4)
            .map(|_| handle_reconciliation_error(job(), &operation_error(), ctx.clone()))
            .collect();
        assert_eq!(
            delays,
            vec![
                Action::requeue(Duration::from_secs(1)),
                Action::requeue(Duration::from_secs(2)),
                Action::requeue(Duration::from_secs(4)),
                Action::requeue(Duration::from_secs(4)),
            ]
        );

        ctx.reset_backoff(&ObjectKey::new("data", "etl-1"));
        assert_eq!(
            handle_reconciliation_error(job(), &operation_error(), ctx),
            Action::requeue(Duration::from_secs(1))
        );
    }
}
