//! # Custom Resource Definitions
//!
//! CRD types for the Glue Job Controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `GlueJob` specification and default values
//! - `status.rs` - Status types for tracking reconciliation outcomes

mod spec;
mod status;

// Re-export all public types
pub use spec::{
    default_execution_class, default_glue_version, default_max_concurrent_runs,
    default_number_of_workers, default_python_version, default_runtime,
    default_timeout_in_minutes, default_worker_type, GlueJob, GlueJobCommand,
    GlueJobExecutionProperty, GlueJobSpec,
};
pub use status::{Condition, ConditionType, GlueJobStatus};
