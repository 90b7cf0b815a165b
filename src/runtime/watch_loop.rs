//! # Watch Loop
//!
//! Controller watch loop that monitors `GlueJob` resources and triggers
//! reconciliation when changes are detected.

use crate::controller::reconciler::{reconcile, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::GlueJob;
use crate::runtime::error_policy::{handle_controller_error, handle_reconciliation_error};
use crate::runtime::event_filter::GenerationFilter;
use futures::{FutureExt, StreamExt};
use kube::api::Api;
use kube_runtime::{controller, reflector, watcher, Controller, WatchStreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

/// Resolve on the first SIGINT or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler, listening for SIGINT only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM (pod termination)"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received SIGINT");
    }
}

/// Mark the server not ready once `signal` resolves
async fn mark_not_ready_on<F: Future<Output = ()>>(signal: F, server_state: Arc<ServerState>) {
    signal.await;
    info!("Initiating graceful shutdown...");
    server_state.set_ready(false);
    info!("Marked server as not ready, waiting for in-flight reconciliations to complete...");
}

/// Run the controller watch loop
///
/// Reconciles are deduplicated per object key and bounded by
/// `MAX_CONCURRENT_RECONCILES`. The loop restarts the controller when its
/// stream ends and exits once a shutdown signal marked the server not ready.
///
/// # Errors
///
/// Currently never fails; the signature leaves room for setup errors.
pub async fn run_watch_loop(
    jobs: Api<GlueJob>,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
) -> Result<(), anyhow::Error> {
    let config = reconciler.config().clone();
    let concurrency = u16::try_from(config.max_concurrent_reconciles).unwrap_or(u16::MAX);

    // Readiness drops before any controller sees the shutdown
    let shutdown = mark_not_ready_on(shutdown_signal(), server_state.clone())
        .boxed()
        .shared();
    tokio::spawn(shutdown.clone());

    loop {
        if !server_state.is_ready() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        let watch_span = tracing::span!(
            tracing::Level::INFO,
            "controller.watch",
            operation = "watch_loop"
        );

        info!(
            "Starting controller watch loop (max concurrent reconciles: {})...",
            concurrency
        );

        let (reader, writer) = reflector::store();
        let mut filter = GenerationFilter::default();
        let triggers = watcher(jobs.clone(), watcher::Config::default().any_semantic())
            .default_backoff()
            .reflect(writer)
            .filter_map(move |event| futures::future::ready(filter.filter_event(event)));

        Controller::for_stream(triggers, reader)
            .with_config(controller::Config::default().concurrency(concurrency))
            .graceful_shutdown_on(shutdown.clone())
            .run(reconcile, handle_reconciliation_error, reconciler.clone())
            .for_each(|result| {
                match result {
                    Ok((obj_ref, _action)) => debug!("Reconciled {}", obj_ref),
                    Err(e) => handle_controller_error(&e),
                }
                futures::future::ready(())
            })
            .instrument(watch_span)
            .await;

        if !server_state.is_ready() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        warn!(
            "Controller watch stream ended, restarting in {} seconds...",
            config.watch_restart_delay_secs
        );
        tokio::time::sleep(config.watch_restart_delay()).await;
    }

    info!("Controller stopped gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_marks_server_not_ready() {
        let state = Arc::new(ServerState::default());
        state.set_ready(true);

        mark_not_ready_on(futures::future::ready(()), state.clone()).await;

        assert!(!state.is_ready(), "shutdown must stop the watch loop from restarting");
    }

    #[tokio::test]
    async fn test_not_ready_before_signal() {
        let state = Arc::new(ServerState::default());
        state.set_ready(true);

        let pending = mark_not_ready_on(futures::future::pending(), state.clone());
        let finished = tokio::time::timeout(std::time::Duration::from_millis(20), pending).await;

        assert!(finished.is_err());
        assert!(state.is_ready());
    }
}
