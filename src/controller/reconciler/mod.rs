//! # Reconciler
//!
//! Core reconciliation logic for `GlueJob` resources.
//!
//! The reconciler:
//! - Fetches the latest `GlueJob` and ignores objects that are gone
//! - Connects a Glue adapter and checks whether the owned job exists
//! - Creates, updates or deletes the Glue job
//! - Keeps the finalizer in place while a Glue job may exist
//! - Appends `Ready` / `NotReady` conditions to the status
//!
//! ## Reconciliation Flow
//!
//! 1. Fetch the object (`store`)
//! 2. Build the adapter and run the existence check (`provider`)
//! 3. Plan the step (`plan`)
//! 4. Apply it, then persist finalizers (`finalizer`) and conditions (`conditions`)

pub mod conditions;
pub mod context;
pub mod finalizer;
pub mod plan;
pub mod reconcile;
pub mod store;
pub mod types;

// Re-export public API
pub use context::{DeadlineExceeded, ObjectKey, ReconcileContext};
pub use plan::{plan_step, ReconcileStep};
pub use reconcile::{reconcile, Reconciler};
pub use store::{GlueJobStore, KubeGlueJobStore};
pub use types::{FailureReason, ReconcilerError};
