//! Domain models for SurveyPipeline
//!
//! These types represent the records flowing through the pipeline:
//! - Survey responses: synthetic records produced by the generator
//! - Stored user records: the table row the consumer maintains per user
//! - Invocation responses: the `{statusCode, body}` envelope both Lambdas return

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::Result;

/// A single synthetic survey response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    /// Schema version tag
    #[serde(rename = "Version")]
    pub version: String,
    /// Six alphanumeric characters, not guaranteed unique
    #[serde(rename = "userid")]
    pub user_id: String,
    /// Question key (`q1`..`qK`) to answer (`value1`..`value3`)
    pub response: BTreeMap<String, String>,
}

/// Table row keyed by `userid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUserRecord {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(rename = "Version")]
    pub version: String,
    /// Replaced wholesale on every upsert
    pub response: serde_json::Value,
}

/// Body returned by the generator when every batch was accepted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSuccess {
    pub message: String,
    pub output_data: Vec<SurveyResponse>,
}

impl GenerateSuccess {
    pub fn new(output_data: Vec<SurveyResponse>) -> Self {
        Self {
            message: "Data sent successfully".to_string(),
            output_data,
        }
    }
}

/// Body returned by the generator when a batch could not be delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

/// Lambda result envelope; `body` always holds JSON text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    /// Build a response whose body is `body` encoded as JSON
    pub fn json<T: Serialize + ?Sized>(status_code: u16, body: &T) -> Result<Self> {
        Ok(Self {
            status_code,
            body: serde_json::to_string(body)?,
        })
    }
}
