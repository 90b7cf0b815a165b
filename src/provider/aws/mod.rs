//! # AWS Glue Client
//!
//! Adapter for the AWS Glue job API.
//!
//! This module provides functionality to:
//! - Check whether an owned Glue job exists (paginated `ListJobs` filtered by tag)
//! - Create, fully update and delete Glue jobs
//! - Load AWS credentials through the SDK default chain (IRSA on EKS)

mod listing;

pub use listing::{contains_job, JobLister, JobPage, OwnedJobLister};

use crate::constants::{GLUE_ETL_COMMAND, OWNER_TAG_KEY, OWNER_TAG_VALUE};
use crate::controller::reconciler::ReconcileContext;
use crate::crd::{GlueJobCommand, GlueJobSpec};
use crate::observability::metrics;
use crate::provider::{GlueJobOperations, GlueJobProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_glue::types::{ExecutionClass, ExecutionProperty, JobCommand, JobUpdate, WorkerType};
use aws_sdk_glue::Client as GlueClient;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};

/// Provider building Glue adapters from a shared SDK configuration
#[derive(Clone)]
pub struct AwsGlueProvider {
    sdk_config: SdkConfig,
}

impl std::fmt::Debug for AwsGlueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsGlueProvider")
            .field("region", &self.sdk_config.region())
            .finish_non_exhaustive()
    }
}

impl AwsGlueProvider {
    /// Load the SDK configuration from the default credential chain
    ///
    /// On EKS the pod service account annotation `eks.amazonaws.com/role-arn`
    /// supplies credentials (IRSA).
    pub async fn load(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;
        info!(
            region = ?sdk_config.region(),
            "Loaded AWS SDK configuration"
        );
        Self { sdk_config }
    }

    #[must_use]
    pub fn from_sdk_config(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }
}

#[async_trait]
impl GlueJobProvider for AwsGlueProvider {
    async fn connect(
        &self,
        ctx: &ReconcileContext,
        spec: &GlueJobSpec,
    ) -> Result<Box<dyn GlueJobOperations>> {
        let client = GlueClient::new(&self.sdk_config);
        let start = Instant::now();

        let lister = OwnedJobLister::new(&client);
        let exists = ctx
            .run("ListJobs", contains_job(&lister, &spec.name))
            .await
            .inspect_err(|_| metrics::increment_glue_operation_errors("list"))
            .with_context(|| format!("failed to check if GlueJob {} exists on AWS", spec.name))?;
        metrics::record_glue_operation("list", start.elapsed().as_secs_f64());

        debug!(job = %spec.name, exists, "Checked Glue job existence");
        Ok(Box::new(GlueJobAdapter {
            client,
            spec: spec.clone(),
            exists,
        }))
    }
}

/// Glue job adapter bound to one desired spec
pub struct GlueJobAdapter {
    client: GlueClient,
    spec: GlueJobSpec,
    exists: bool,
}

impl std::fmt::Debug for GlueJobAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlueJobAdapter")
            .field("job", &self.spec.name)
            .field("exists", &self.exists)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GlueJobOperations for GlueJobAdapter {
    fn exists(&self) -> bool {
        self.exists
    }

    async fn create(&self, ctx: &ReconcileContext) -> Result<()> {
        let spec = &self.spec;
        let span = info_span!("aws.glue.create_job", job.name = %spec.name);
        let start = Instant::now();

        let request = self
            .client
            .create_job()
            .name(&spec.name)
            .command(job_command(&spec.command))
            .role(&spec.role)
            .timeout(spec.timeout_in_minutes)
            .glue_version(&spec.glue_version)
            .number_of_workers(spec.number_of_workers)
            .worker_type(WorkerType::from(spec.worker_type.as_str()))
            .execution_class(ExecutionClass::from(spec.execution_class.as_str()))
            .execution_property(execution_property(spec))
            .max_retries(spec.max_retries)
            .set_default_arguments(spec.default_arguments.clone())
            .tags(OWNER_TAG_KEY, OWNER_TAG_VALUE);

        ctx.run("CreateJob", async {
            request
                .send()
                .await
                .with_context(|| format!("failed to create Glue Job {}", spec.name))
        })
        .instrument(span)
        .await
        .inspect_err(|_| metrics::increment_glue_operation_errors("create"))?;

        metrics::record_glue_operation("create", start.elapsed().as_secs_f64());
        info!(job = %spec.name, "Created Glue job");
        Ok(())
    }

    async fn update(&self, ctx: &ReconcileContext) -> Result<()> {
        let spec = &self.spec;
        let span = info_span!("aws.glue.update_job", job.name = %spec.name);
        let start = Instant::now();

        let request = self
            .client
            .update_job()
            .job_name(&spec.name)
            .job_update(job_update(spec));

        ctx.run("UpdateJob", async {
            request
                .send()
                .await
                .with_context(|| format!("failed to update Glue Job {}", spec.name))
        })
        .instrument(span)
        .await
        .inspect_err(|_| metrics::increment_glue_operation_errors("update"))?;

        metrics::record_glue_operation("update", start.elapsed().as_secs_f64());
        debug!(job = %spec.name, "Updated Glue job");
        Ok(())
    }

    async fn delete(&self, ctx: &ReconcileContext) -> Result<()> {
        let spec = &self.spec;
        if !self.exists {
            debug!(job = %spec.name, "Glue job does not exist, nothing to delete");
            return Ok(());
        }

        let span = info_span!("aws.glue.delete_job", job.name = %spec.name);
        let start = Instant::now();
        let request = self.client.delete_job().job_name(&spec.name);

        ctx.run("DeleteJob", async {
            request
                .send()
                .await
                .with_context(|| format!("failed to delete Glue Job {}", spec.name))
        })
        .instrument(span)
        .await
        .inspect_err(|_| metrics::increment_glue_operation_errors("delete"))?;

        metrics::record_glue_operation("delete", start.elapsed().as_secs_f64());
        info!(job = %spec.name, "Deleted Glue job");
        Ok(())
    }
}

/// Build the Glue command; the runtime is only sent for non-`glueetl` commands
#[must_use]
pub fn job_command(command: &GlueJobCommand) -> JobCommand {
    let runtime = (!command.name.eq_ignore_ascii_case(GLUE_ETL_COMMAND))
        .then(|| command.runtime.clone());

    JobCommand::builder()
        .name(&command.name)
        .python_version(command.python_version.to_string())
        .script_location(&command.script_location)
        .set_runtime(runtime)
        .build()
}

fn execution_property(spec: &GlueJobSpec) -> ExecutionProperty {
    ExecutionProperty::builder()
        .max_concurrent_runs(spec.execution_property.max_concurrent_runs)
        .build()
}

/// Full-replace update payload; name and tags are immutable after creation
#[must_use]
pub fn job_update(spec: &GlueJobSpec) -> JobUpdate {
    JobUpdate::builder()
        .command(job_command(&spec.command))
        .role(&spec.role)
        .timeout(spec.timeout_in_minutes)
        .glue_version(&spec.glue_version)
        .number_of_workers(spec.number_of_workers)
        .worker_type(WorkerType::from(spec.worker_type.as_str()))
        .execution_class(ExecutionClass::from(spec.execution_class.as_str()))
        .execution_property(execution_property(spec))
        .max_retries(spec.max_retries)
        .set_default_arguments(spec.default_arguments.clone())
        .build()
}
