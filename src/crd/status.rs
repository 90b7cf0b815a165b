//! # GlueJob Status
//!
//! Status types for tracking reconciliation outcomes.

use crate::constants::{CONDITION_NOT_READY, CONDITION_READY};
use serde::{Deserialize, Serialize};

/// Status of the GlueJob resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlueJobStatus {
    /// Append-only log of reconciliation outcomes; the latest entry per type wins
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl GlueJobStatus {
    /// Most recent condition of the given type
    #[must_use]
    pub fn latest(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.conditions
            .iter()
            .rev()
            .find(|c| c.r#type == condition_type.as_str())
    }

    /// Most recent condition of any type
    #[must_use]
    pub fn last(&self) -> Option<&Condition> {
        self.conditions.last()
    }
}

/// Condition represents a condition of a resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: String,
    /// Last transition time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    /// Reason for the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Message describing the condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// Build a condition stamped with the current time
    pub fn new(condition_type: ConditionType, reason: &str, message: impl Into<String>) -> Self {
        Self {
            r#type: condition_type.as_str().to_string(),
            status: "True".to_string(),
            last_transition_time: Some(chrono::Utc::now().to_rfc3339()),
            reason: Some(reason.to_string()),
            message: Some(message.into()),
        }
    }
}

/// Condition types recorded by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    Ready,
    NotReady,
}

impl ConditionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Ready => CONDITION_READY,
            ConditionType::NotReady => CONDITION_NOT_READY,
        }
    }
}
