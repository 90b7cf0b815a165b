//! Glue Job Controller Library
//!
//! Reconciles `GlueJob` custom resources against AWS Glue.
//!
//! ## Quick Start
//!
//! ```rust
//! use glue_job_controller::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod runtime;
