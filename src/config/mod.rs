//! # Configuration
//!
//! Environment-driven configuration for the controller process.

mod controller;

pub use controller::ControllerConfig;
