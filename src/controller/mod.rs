//! # Controller
//!
//! Core controller modules for the Glue Job Controller.
//!
//! - `backoff`: Exponential backoff for failed reconciliations
//! - `reconciler`: Core reconciliation logic
//! - `server`: HTTP server for metrics and health checks

pub mod backoff;
pub mod reconciler;
pub mod server;
