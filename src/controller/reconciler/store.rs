//! # GlueJob Store
//!
//! Persistence seam between the reconciler and the Kubernetes API server.

use crate::constants::FIELD_MANAGER;
use crate::controller::reconciler::ObjectKey;
use crate::crd::GlueJob;
use anyhow::{Context, Result};
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};

/// Reads and writes `GlueJob` objects
#[async_trait]
pub trait GlueJobStore: Send + Sync {
    /// Fetch the latest object, `None` when it no longer exists
    async fn get(&self, key: &ObjectKey) -> Result<Option<GlueJob>>;

    /// Persist `metadata.finalizers` of `job`
    async fn update_finalizers(&self, job: &GlueJob) -> Result<GlueJob>;

    /// Persist the status sub-resource of `job`
    async fn update_status(&self, job: &GlueJob) -> Result<GlueJob>;
}

/// Store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeGlueJobStore {
    client: Client,
}

impl std::fmt::Debug for KubeGlueJobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeGlueJobStore").finish_non_exhaustive()
    }
}

impl KubeGlueJobStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<GlueJob> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn api_for(&self, job: &GlueJob) -> Api<GlueJob> {
        self.api(&ObjectKey::for_job(job).namespace)
    }
}

#[async_trait]
impl GlueJobStore for KubeGlueJobStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<GlueJob>> {
        self.api(&key.namespace)
            .get_opt(&key.name)
            .await
            .with_context(|| format!("failed to get GlueJob {key}"))
    }

    async fn update_finalizers(&self, job: &GlueJob) -> Result<GlueJob> {
        let name = job.name_any();
        // resourceVersion turns the merge patch into an optimistic update
        let patch = serde_json::json!({
            "metadata": {
                "finalizers": job.finalizers(),
                "resourceVersion": job.resource_version(),
            }
        });

        self.api_for(job)
            .patch(&name, &PatchParams::default(), &Patch::Merge(patch))
            .await
            .with_context(|| format!("failed to update finalizers of GlueJob {name}"))
    }

    async fn update_status(&self, job: &GlueJob) -> Result<GlueJob> {
        let name = job.name_any();
        let patch = serde_json::json!({
            "status": job.status.clone().unwrap_or_default()
        });

        self.api_for(job)
            .patch_status(
                &name,
                &status_patch_params(),
                &Patch::Merge(patch),
            )
            .await
            .with_context(|| format!("failed to update status of GlueJob {name}"))
    }
}

/// Merge-patch params for status writes, attributed to the controller
fn status_patch_params() -> PatchParams {
    PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..PatchParams::default()
    }
}
