//! # Reconciliation Logic
//!
//! Drives one `GlueJob` towards its desired state: fetch, connect the Glue
//! adapter, apply the planned step, then record the outcome as a condition.
//! Errors are returned to `error_policy()`, which schedules the retry.

use crate::config::ControllerConfig;
use crate::controller::backoff::ExponentialBackoff;
use crate::controller::reconciler::conditions::report;
use crate::controller::reconciler::context::{ObjectKey, ReconcileContext};
use crate::controller::reconciler::finalizer::set_finalizer;
use crate::controller::reconciler::plan::{self, ReconcileStep};
use crate::controller::reconciler::store::GlueJobStore;
use crate::controller::reconciler::types::{FailureReason, ReconcilerError};
use crate::crd::GlueJob;
use crate::observability;
use crate::provider::{GlueJobOperations, GlueJobProvider};
use kube_runtime::controller::Action;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Instrument};

/// Shared state of the controller, handed to every reconcile
pub struct Reconciler {
    store: Arc<dyn GlueJobStore>,
    provider: Arc<dyn GlueJobProvider>,
    config: ControllerConfig,
    /// Error backoff per object, dropped on success or once the object is gone
    backoff_states: Mutex<HashMap<ObjectKey, ExponentialBackoff>>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(
        store: Arc<dyn GlueJobStore>,
        provider: Arc<dyn GlueJobProvider>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
            backoff_states: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run one reconcile pass for `key`
    ///
    /// # Errors
    ///
    /// Returns the first failure of the pass, aggregated with any failure to
    /// record it on the object's status.
    pub async fn reconcile_key(&self, key: &ObjectKey) -> Result<(), ReconcilerError> {
        let ctx = ReconcileContext::new(key.clone(), self.config.reconcile_timeout());

        let fetched = ctx
            .run("GetGlueJob", self.store.get(key))
            .await
            .map_err(ReconcilerError::Fetch)?;
        let Some(mut job) = fetched else {
            debug!("GlueJob not found, ignoring since it must have been deleted");
            self.reset_backoff(key);
            return Ok(());
        };

        if !plan::requires_adapter(&job) {
            debug!("GlueJob is being deleted and already finalized");
            return Ok(());
        }

        let adapter = match self.provider.connect(&ctx, &job.spec).await {
            Ok(adapter) => adapter,
            Err(e) => {
                return Err(self
                    .record_failure(&ctx, &mut job, FailureReason::CreateNewResourceFailed, e)
                    .await);
            }
        };

        let step = plan::plan_step(&job, adapter.exists());
        debug!(step = step.as_str(), exists = adapter.exists(), "Planned reconcile step");

        match step {
            ReconcileStep::Skip => Ok(()),
            ReconcileStep::Finalize => self.finalize(&ctx, &mut job, adapter.as_ref()).await,
            ReconcileStep::Create | ReconcileStep::Update => {
                self.apply(&ctx, &mut job, adapter.as_ref(), step).await
            }
        }
    }

    async fn finalize(
        &self,
        ctx: &ReconcileContext,
        job: &mut GlueJob,
        adapter: &dyn GlueJobOperations,
    ) -> Result<(), ReconcilerError> {
        info!(glue_job = %job.spec.name, "Deleting Glue job");
        if let Err(e) = adapter.delete(ctx).await {
            error!(glue_job = %job.spec.name, error = %format!("{e:#}"), "Failed to delete Glue job");
            return Err(ReconcilerError::Finalize(e));
        }

        ctx.run("UpdateFinalizers", set_finalizer(self.store.as_ref(), job, false))
            .await
            .map_err(ReconcilerError::Persist)?;
        info!(glue_job = %job.spec.name, "GlueJob finalized");
        Ok(())
    }

    async fn apply(
        &self,
        ctx: &ReconcileContext,
        job: &mut GlueJob,
        adapter: &dyn GlueJobOperations,
        step: ReconcileStep,
    ) -> Result<(), ReconcilerError> {
        debug!(glue_job = %job.spec.name, step = step.as_str(), "Applying GlueJob");
        let applied = match step {
            ReconcileStep::Create => adapter.create(ctx).await,
            _ => adapter.update(ctx).await,
        };
        if let Err(e) = applied {
            return Err(self
                .record_failure(ctx, job, plan::failure_reason(step), e)
                .await);
        }

        if let Err(e) = ctx
            .run("UpdateFinalizers", set_finalizer(self.store.as_ref(), job, true))
            .await
        {
            return Err(self
                .record_failure(ctx, job, FailureReason::ResourceOperationFailed, e)
                .await);
        }

        if let Some(condition) = plan::success_condition(step) {
            ctx.run("UpdateStatus", report(self.store.as_ref(), job, condition))
                .await
                .map_err(ReconcilerError::Persist)?;
        }
        info!(glue_job = %job.spec.name, step = step.as_str(), "GlueJob reconciled");
        Ok(())
    }

    /// Record `error` as a `NotReady` condition and build the error to return
    async fn record_failure(
        &self,
        ctx: &ReconcileContext,
        job: &mut GlueJob,
        reason: FailureReason,
        error: anyhow::Error,
    ) -> ReconcilerError {
        error!(reason = reason.as_str(), error = %format!("{error:#}"), "GlueJob reconcile step failed");

        let condition = plan::failure_condition(reason, &error);
        let origin = ReconcilerError::Operation {
            reason,
            source: error,
        };
        match ctx
            .run("UpdateStatus", report(self.store.as_ref(), job, condition))
            .await
        {
            Ok(()) => origin,
            Err(persist) => {
                warn!(error = %format!("{persist:#}"), "Failed to record NotReady condition");
                ReconcilerError::Aggregate(vec![origin, ReconcilerError::Persist(persist)])
            }
        }
    }

    /// Next error backoff for `key`, advancing its sequence
    pub fn next_error_backoff(&self, key: &ObjectKey) -> Duration {
        match self.backoff_states.lock() {
            Ok(mut states) => states
                .entry(key.clone())
                .or_insert_with(|| {
                    ExponentialBackoff::new(
                        self.config.backoff_start_duration(),
                        self.config.backoff_max_duration(),
                    )
                })
                .next_backoff(),
            Err(e) => {
                warn!("Failed to lock backoff_states: {}, using maximum backoff", e);
                self.config.backoff_max_duration()
            }
        }
    }

    /// Forget the error backoff of `key`
    pub fn reset_backoff(&self, key: &ObjectKey) {
        if let Ok(mut states) = self.backoff_states.lock() {
            states.remove(key);
        }
    }
}

/// Reconcile entry point for the controller runtime
///
/// # Errors
///
/// Propagates the [`ReconcilerError`] of the pass; the error policy requeues.
pub async fn reconcile(job: Arc<GlueJob>, ctx: Arc<Reconciler>) -> Result<Action, ReconcilerError> {
    let start = Instant::now();
    let key = ObjectKey::for_job(&job);
    let span = tracing::info_span!(
        "glue_job.reconcile",
        resource.name = key.name.as_str(),
        resource.namespace = key.namespace.as_str(),
    );

    observability::metrics::increment_reconciliations();
    let result = ctx.reconcile_key(&key).instrument(span).await;
    observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

    result?;
    ctx.reset_backoff(&key);
    Ok(Action::await_change())
}
