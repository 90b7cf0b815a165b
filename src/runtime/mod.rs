//! # Runtime
//!
//! Process wiring around the reconciler.
//!
//! - `initialization`: logging, metrics, probe server and client setup
//! - `event_filter`: drops watch events that need no reconcile
//! - `watch_loop`: runs the controller and restarts it when the stream ends
//! - `error_policy`: requeue decisions for failed reconciliations

pub mod error_policy;
pub mod event_filter;
pub mod initialization;
pub mod watch_loop;
