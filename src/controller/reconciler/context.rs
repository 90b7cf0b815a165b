//! # Reconcile Context
//!
//! Per-reconcile request context passed explicitly to every call that talks to
//! the Glue API or the Kubernetes API.

use crate::crd::GlueJob;
use kube::ResourceExt;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Namespace and name identifying a `GlueJob` object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an existing object, defaulting the namespace to `default`
    #[must_use]
    pub fn for_job(job: &GlueJob) -> Self {
        Self::new(
            job.namespace().unwrap_or_else(|| "default".to_string()),
            job.name_any(),
        )
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Returned when an operation outlives the reconcile deadline
#[derive(Debug, Error)]
#[error("{operation} for {key} exceeded the reconcile deadline")]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub key: ObjectKey,
}

/// Context of a single reconcile pass
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    key: ObjectKey,
    deadline: Instant,
}

impl ReconcileContext {
    #[must_use]
    pub fn new(key: ObjectKey, timeout: Duration) -> Self {
        Self {
            key,
            deadline: Instant::now() + timeout,
        }
    }

    #[must_use]
    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// Time left before the deadline, zero once it has passed
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Run `operation` bounded by the reconcile deadline
    ///
    /// The future is dropped when the deadline passes, so in-flight requests are
    /// abandoned rather than retried.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout_at(self.deadline, fut).await {
            Ok(result) => result,
            Err(_elapsed) => Err(DeadlineExceeded {
                operation,
                key: self.key.clone(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_display() {
        assert_eq!(ObjectKey::new("data", "etl-1").to_string(), "data/etl-1");
    }

    #[tokio::test]
    async fn test_run_returns_operation_result() {
        let ctx = ReconcileContext::new(ObjectKey::new("ns", "job"), Duration::from_secs(5));
        let value = ctx.run("noop", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_fails_when_deadline_passes() {
        let ctx = ReconcileContext::new(ObjectKey::new("ns", "job"), Duration::from_millis(10));
        let result: anyhow::Result<()> = ctx
            .run("ListJobs", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        let err = result.unwrap_err();
        let deadline = err.downcast_ref::<DeadlineExceeded>().unwrap();
        assert_eq!(deadline.operation, "ListJobs");
        assert_eq!(deadline.key, ObjectKey::new("ns", "job"));
        assert_eq!(ctx.remaining(), Duration::ZERO);
    }
}
