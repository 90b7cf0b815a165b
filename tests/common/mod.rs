//! Common test utilities for reconciler integration tests
//!
//! In-memory stand-ins for the Kubernetes API (`FakeStore`) and for AWS Glue
//! (`FakeGlue` behind `FakeProvider`), with counters and failure injection.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use glue_job_controller::config::ControllerConfig;
use glue_job_controller::constants::{GLUE_JOB_FINALIZER, OWNER_TAG_KEY, OWNER_TAG_VALUE};
use glue_job_controller::controller::reconciler::{
    GlueJobStore, ObjectKey, ReconcileContext, Reconciler,
};
use glue_job_controller::crd::{GlueJob, GlueJobSpec};
use glue_job_controller::provider::{GlueJobOperations, GlueJobProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const NAMESPACE: &str = "data";

/// A `GlueJob` named `name` with every defaulted field left out
pub fn glue_job(name: &str) -> GlueJob {
    let yaml = format!(
        r#"
apiVersion: aws.90poe.io/v1alpha1
kind: GlueJob
metadata:
  name: {name}
  namespace: {NAMESPACE}
  generation: 1
spec:
  name: {name}
  command:
    name: glueetl
    scriptLocation: s3://scripts/{name}.py
  role: arn:aws:iam::123456789012:role/glue
"#
    );
    serde_yaml::from_str(&yaml).expect("Should deserialize GlueJob fixture")
}

/// `job` marked for deletion, carrying `finalizers`
pub fn deleting(mut job: GlueJob, finalizers: &[&str]) -> GlueJob {
    let mut metadata = serde_json::to_value(&job.metadata).expect("metadata serializes");
    metadata["deletionTimestamp"] = serde_json::json!("2024-05-01T10:00:00Z");
    job.metadata = serde_json::from_value(metadata).expect("metadata deserializes");
    job.metadata.finalizers = Some(finalizers.iter().map(ToString::to_string).collect());
    job
}

pub fn key(name: &str) -> ObjectKey {
    ObjectKey::new(NAMESPACE, name)
}

pub fn has_finalizer(job: &GlueJob) -> bool {
    job.metadata
        .finalizers
        .as_ref()
        .is_some_and(|f| f.iter().any(|f| f == GLUE_JOB_FINALIZER))
}

/// In-memory Kubernetes API for `GlueJob` objects
///
/// Mirrors the API server: an object marked for deletion disappears once its
/// last finalizer is removed.
#[derive(Default)]
pub struct FakeStore {
    objects: Mutex<HashMap<ObjectKey, GlueJob>>,
    pub finalizer_writes: AtomicUsize,
    pub status_writes: AtomicUsize,
    pub fail_finalizers: AtomicBool,
    pub fail_status: AtomicBool,
    get_delay: Mutex<Option<Duration>>,
}

impl FakeStore {
    pub fn with(jobs: Vec<GlueJob>) -> Arc<Self> {
        let store = Self::default();
        {
            let mut objects = store.objects.lock().unwrap();
            for job in jobs {
                objects.insert(ObjectKey::for_job(&job), job);
            }
        }
        Arc::new(store)
    }

    pub fn object(&self, name: &str) -> Option<GlueJob> {
        self.objects.lock().unwrap().get(&key(name)).cloned()
    }

    pub fn set_get_delay(&self, delay: Duration) {
        *self.get_delay.lock().unwrap() = Some(delay);
    }

    pub fn finalizer_writes(&self) -> usize {
        self.finalizer_writes.load(Ordering::SeqCst)
    }

    pub fn status_writes(&self) -> usize {
        self.status_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GlueJobStore for FakeStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<GlueJob>> {
        let delay = *self.get_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn update_finalizers(&self, job: &GlueJob) -> Result<GlueJob> {
        if self.fail_finalizers.load(Ordering::SeqCst) {
            return Err(anyhow!("conflict: the object has been modified"));
        }
        self.finalizer_writes.fetch_add(1, Ordering::SeqCst);

        let key = ObjectKey::for_job(job);
        let mut objects = self.objects.lock().unwrap();
        let stored = objects
            .get_mut(&key)
            .ok_or_else(|| anyhow!("gluejobs {key} not found"))?;
        stored.metadata.finalizers = job.metadata.finalizers.clone();

        let updated = stored.clone();
        let released = updated.metadata.deletion_timestamp.is_some()
            && updated.metadata.finalizers.as_ref().is_none_or(Vec::is_empty);
        if released {
            objects.remove(&key);
        }
        Ok(updated)
    }

    async fn update_status(&self, job: &GlueJob) -> Result<GlueJob> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(anyhow!("status update rejected"));
        }
        self.status_writes.fetch_add(1, Ordering::SeqCst);

        let key = ObjectKey::for_job(job);
        let mut objects = self.objects.lock().unwrap();
        let stored = objects
            .get_mut(&key)
            .ok_or_else(|| anyhow!("gluejobs {key} not found"))?;
        stored.status = job.status.clone();
        Ok(stored.clone())
    }
}

/// Glue job as stored by `FakeGlue`
#[derive(Debug, Clone, PartialEq)]
pub struct StoredJob {
    pub spec: GlueJobSpec,
    pub tags: HashMap<String, String>,
}

/// In-memory AWS Glue
#[derive(Default)]
pub struct FakeGlue {
    jobs: Mutex<HashMap<String, StoredJob>>,
    pub connects: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_connect: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl FakeGlue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an owned job that already exists in Glue
    pub fn seed(&self, spec: &GlueJobSpec) {
        self.jobs.lock().unwrap().insert(
            spec.name.clone(),
            StoredJob {
                spec: spec.clone(),
                tags: owner_tags(),
            },
        );
    }

    pub fn job(&self, name: &str) -> Option<StoredJob> {
        self.jobs.lock().unwrap().get(name).cloned()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn owner_tags() -> HashMap<String, String> {
    HashMap::from([(OWNER_TAG_KEY.to_string(), OWNER_TAG_VALUE.to_string())])
}

/// Adapter factory over a shared `FakeGlue`
pub struct FakeProvider {
    pub glue: Arc<FakeGlue>,
}

#[async_trait]
impl GlueJobProvider for FakeProvider {
    async fn connect(
        &self,
        _ctx: &ReconcileContext,
        spec: &GlueJobSpec,
    ) -> Result<Box<dyn GlueJobOperations>> {
        self.glue.connects.fetch_add(1, Ordering::SeqCst);
        if self.glue.fail_connect.load(Ordering::SeqCst) {
            return Err(anyhow!("failed to get page 1 of owned Glue jobs: AccessDeniedException"));
        }
        let exists = self.glue.jobs.lock().unwrap().contains_key(&spec.name);
        Ok(Box::new(FakeAdapter {
            glue: self.glue.clone(),
            spec: spec.clone(),
            exists,
        }))
    }
}

struct FakeAdapter {
    glue: Arc<FakeGlue>,
    spec: GlueJobSpec,
    exists: bool,
}

#[async_trait]
impl GlueJobOperations for FakeAdapter {
    fn exists(&self) -> bool {
        self.exists
    }

    async fn create(&self, _ctx: &ReconcileContext) -> Result<()> {
        if self.glue.fail_create.load(Ordering::SeqCst) {
            return Err(anyhow!("CreateJob: dispatch failure: connection reset"));
        }
        self.glue.creates.fetch_add(1, Ordering::SeqCst);
        self.glue.seed(&self.spec);
        Ok(())
    }

    async fn update(&self, _ctx: &ReconcileContext) -> Result<()> {
        if self.glue.fail_update.load(Ordering::SeqCst) {
            return Err(anyhow!("UpdateJob: InvalidInputException"));
        }
        self.glue.updates.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.glue.jobs.lock().unwrap();
        let stored = jobs
            .get_mut(&self.spec.name)
            .ok_or_else(|| anyhow!("UpdateJob: EntityNotFoundException"))?;
        stored.spec = self.spec.clone();
        Ok(())
    }

    async fn delete(&self, _ctx: &ReconcileContext) -> Result<()> {
        if !self.exists {
            return Ok(());
        }
        if self.glue.fail_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("DeleteJob: ThrottlingException"));
        }
        self.glue.deletes.fetch_add(1, Ordering::SeqCst);
        self.glue.jobs.lock().unwrap().remove(&self.spec.name);
        Ok(())
    }
}

pub fn reconciler(store: Arc<FakeStore>, glue: Arc<FakeGlue>) -> Arc<Reconciler> {
    reconciler_with(store, glue, ControllerConfig::default())
}

pub fn reconciler_with(
    store: Arc<FakeStore>,
    glue: Arc<FakeGlue>,
    config: ControllerConfig,
) -> Arc<Reconciler> {
    Arc::new(Reconciler::new(store, Arc::new(FakeProvider { glue }), config))
}
