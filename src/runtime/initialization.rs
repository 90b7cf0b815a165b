//! # Initialization
//!
//! Controller initialization logic including rustls setup, tracing, metrics,
//! server startup, and Kubernetes and AWS client setup.

use crate::config::ControllerConfig;
use crate::controller::reconciler::{KubeGlueJobStore, Reconciler};
use crate::controller::server::{start_server, ServerState};
use crate::crd::GlueJob;
use crate::observability;
use crate::provider::aws::AwsGlueProvider;
use anyhow::{Context, Result};
use kube::{api::Api, Client};
use std::sync::Arc;
use tracing::{error, info};

/// Initialization result containing all necessary components for the controller
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// API for `GlueJob` resources across all namespaces
    pub jobs: Api<GlueJob>,
    /// Reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready())
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes client creation
/// - AWS SDK configuration
/// - Reconciler setup
///
/// # Errors
///
/// Fails when metrics cannot be registered or no Kubernetes client can be built.
pub async fn initialize() -> Result<InitializationResult> {
    // Must run before any TLS connection; an already installed provider is kept
    let _ = rustls::crypto::ring::default_provider().install_default();

    observability::logging::init_logging();

    info!("Starting Glue Job Controller");
    info!(
        "Build info: datetime={}, git_hash={}",
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    let config = ControllerConfig::from_env();
    info!(
        max_concurrent_reconciles = config.max_concurrent_reconciles,
        reconcile_timeout_secs = config.reconcile_timeout_secs,
        backoff_start_ms = config.backoff_start_ms,
        backoff_max_ms = config.backoff_max_ms,
        "Loaded controller configuration"
    );

    let server_state = Arc::new(ServerState::default());

    // Start HTTP server for metrics and probes
    let server_state_clone = server_state.clone();
    let server_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    // Watch all namespaces
    let jobs: Api<GlueJob> = Api::all(client.clone());

    let provider = AwsGlueProvider::load(config.aws_region.as_deref()).await;
    let store = KubeGlueJobStore::new(client.clone());
    let reconciler = Arc::new(Reconciler::new(
        Arc::new(store),
        Arc::new(provider),
        config,
    ));

    server_state.set_ready(true);
    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        client,
        jobs,
        reconciler,
        server_state,
    })
}
