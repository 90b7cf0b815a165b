//! # Glue Job Controller
//!
//! A Kubernetes controller that keeps AWS Glue jobs in sync with `GlueJob`
//! custom resources.
//!
//! ## Overview
//!
//! For every `GlueJob` the controller:
//!
//! 1. **Checks existence** - Lists Glue jobs tagged `glue-jobs-operator=true`
//! 2. **Creates or updates** - Pushes the full desired definition to Glue
//! 3. **Finalizes** - Deletes the Glue job before the resource is removed
//! 4. **Reports** - Appends `Ready` / `NotReady` conditions to the status
//!
//! Metrics and probes are served on `METRICS_PORT` (default 5000).

use anyhow::Result;
use glue_job_controller::runtime::{initialization::initialize, watch_loop::run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;

    run_watch_loop(init.jobs, init.reconciler, init.server_state).await
}
