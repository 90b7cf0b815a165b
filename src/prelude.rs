//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use glue_job_controller::prelude::*;
//! ```

// CRD types - most commonly used
pub use crate::crd::*;

// Provider traits - needed for implementing adapters
pub use crate::provider::{GlueJobOperations, GlueJobProvider};

// Reconciler types - core controller functionality
pub use crate::controller::reconciler::{
    reconcile, GlueJobStore, ObjectKey, ReconcileContext, Reconciler, ReconcilerError,
};

// Config types - for configuration management
pub use crate::config::ControllerConfig;
