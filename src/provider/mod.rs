//! # Provider Modules
//!
//! External resource adapters translating a `GlueJobSpec` into cloud API calls.
//!
//! - `GlueJobProvider` builds a fresh adapter per reconcile
//! - `GlueJobOperations` is the capability set the reconciler drives

use crate::controller::reconciler::ReconcileContext;
use crate::crd::GlueJobSpec;
use anyhow::Result;
use async_trait::async_trait;

/// Operations on one external Glue job, bound to a desired spec
///
/// None of the operations retry; failures are surfaced to the reconciler,
/// which requeues.
#[async_trait]
pub trait GlueJobOperations: Send + Sync {
    /// Whether an owned job with the desired name existed when the adapter was built
    fn exists(&self) -> bool;

    /// Create the job with every mutable field and the ownership tag
    async fn create(&self, ctx: &ReconcileContext) -> Result<()>;

    /// Replace every mutable field of the existing job
    async fn update(&self, ctx: &ReconcileContext) -> Result<()>;

    /// Delete the job; succeeds without a call when it did not exist
    async fn delete(&self, ctx: &ReconcileContext) -> Result<()>;
}

/// Factory for adapters, one per reconcile
#[async_trait]
pub trait GlueJobProvider: Send + Sync {
    /// Build an adapter for `spec`, running the existence check
    async fn connect(
        &self,
        ctx: &ReconcileContext,
        spec: &GlueJobSpec,
    ) -> Result<Box<dyn GlueJobOperations>>;
}

// Provider implementations
pub mod aws;
