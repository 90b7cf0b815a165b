//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Finalizer token blocking `GlueJob` deletion until the Glue job is removed
pub const GLUE_JOB_FINALIZER: &str = "gluejobs.aws.90poe.io/finalizer";

/// Tag key marking a Glue job as owned by this controller
pub const OWNER_TAG_KEY: &str = "glue-jobs-operator";

/// Tag value marking a Glue job as owned by this controller
pub const OWNER_TAG_VALUE: &str = "true";

/// Built-in Spark ETL command name; Glue rejects an explicit runtime for it
pub const GLUE_ETL_COMMAND: &str = "glueetl";

/// Page size used when listing owned Glue jobs
pub const LIST_JOBS_PAGE_SIZE: i32 = 100;

/// Field manager name used for patches
pub const FIELD_MANAGER: &str = "glue-job-controller";

/// Condition type recorded after a successful reconciliation
pub const CONDITION_READY: &str = "Ready";

/// Condition type recorded after a failed reconciliation
pub const CONDITION_NOT_READY: &str = "NotReady";

/// Condition reason for a successful reconciliation
pub const REASON_SUCCESS: &str = "Success";

/// Fixed requeue delay after a failed finalization (seconds)
pub const FINALIZE_RETRY_SECS: u64 = 5;

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 5000;

/// Default maximum number of reconciliations running at once
pub const DEFAULT_MAX_CONCURRENT_RECONCILES: usize = 1;

/// Default deadline for a single reconciliation pass (seconds)
pub const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 60;

/// Default exponential backoff starting value (milliseconds)
pub const DEFAULT_BACKOFF_START_MS: u64 = 1000;

/// Default exponential backoff maximum value (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 300_000;

/// Default delay before restarting the watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 5;

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "glue_job_controller=info";
