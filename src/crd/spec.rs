//! # GlueJob Spec
//!
//! Main CRD specification types and default values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// GlueJob Custom Resource Definition
///
/// Describes an AWS Glue job that the controller keeps in sync.
///
/// # Example
///
/// ```yaml
/// apiVersion: aws.90poe.io/v1alpha1
/// kind: GlueJob
/// metadata:
///   name: etl-1
///   namespace: data
/// spec:
///   name: etl-1
///   command:
///     name: glueetl
///     scriptLocation: s3://bucket/jobs/etl.py
///   role: arn:aws:iam::123456789012:role/glue-etl
///   defaultArguments:
///     --job-language: python
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "GlueJob",
    group = "aws.90poe.io",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::GlueJobStatus",
    shortname = "gj",
    printcolumn = r#"{"name":"Job", "type":"string", "jsonPath":".spec.name"}, {"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GlueJobSpec {
    /// Name of the Glue job; identifies the job in AWS and must not change
    pub name: String,
    /// Glue job command
    pub command: GlueJobCommand,
    /// IAM role used by the Glue job
    #[schemars(regex(pattern = r"^arn:aws:iam::.*:role/.*$"))]
    pub role: String,
    /// Timeout in minutes, max 2 days
    #[serde(rename = "timeout", default = "default_timeout_in_minutes")]
    #[schemars(range(max = 2880))]
    pub timeout_in_minutes: i32,
    /// Glue version
    #[serde(default = "default_glue_version")]
    pub glue_version: String,
    /// Number of workers allocated per run
    #[serde(default = "default_number_of_workers")]
    pub number_of_workers: i32,
    /// Worker type, e.g. G.1X
    #[serde(default = "default_worker_type")]
    pub worker_type: String,
    /// Execution class: FLEX or STANDARD
    #[serde(default = "default_execution_class")]
    #[schemars(regex(pattern = r"^(FLEX|STANDARD)$"))]
    pub execution_class: String,
    #[serde(default)]
    pub execution_property: GlueJobExecutionProperty,
    /// Maximum number of retries after a failed run
    #[serde(default)]
    pub max_retries: i32,
    /// Default arguments passed to every run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_arguments: Option<HashMap<String, String>>,
}

/// Glue job command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlueJobCommand {
    /// Command name: glueetl, gluestreaming or pythonshell
    pub name: String,
    /// Python version (2 or 3)
    #[serde(default = "default_python_version")]
    #[schemars(range(min = 2, max = 3))]
    pub python_version: i32,
    /// Runtime identifier, ignored for glueetl
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// S3 location of the job script
    #[schemars(regex(pattern = r"^s3://.+/.+$"))]
    pub script_location: String,
}

/// Execution properties of a Glue job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlueJobExecutionProperty {
    /// Maximum number of concurrent runs
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: i32,
}

impl Default for GlueJobExecutionProperty {
    fn default() -> Self {
        Self {
            max_concurrent_runs: default_max_concurrent_runs(),
        }
    }
}

#[must_use]
pub fn default_timeout_in_minutes() -> i32 {
    20
}

#[must_use]
pub fn default_glue_version() -> String {
    "4.0".to_string()
}

#[must_use]
pub fn default_number_of_workers() -> i32 {
    2
}

#[must_use]
pub fn default_worker_type() -> String {
    "G.1X".to_string()
}

#[must_use]
pub fn default_execution_class() -> String {
    "FLEX".to_string()
}

#[must_use]
pub fn default_python_version() -> i32 {
    3
}

#[must_use]
pub fn default_runtime() -> String {
    "glueetl".to_string()
}

#[must_use]
pub fn default_max_concurrent_runs() -> i32 {
    1
}
