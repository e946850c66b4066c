//! Environment configuration for the SurveyPipeline Lambdas
//!
//! Read once at cold start; every invocation handled by the process reuses it.

use std::time::Duration;

use crate::errors::{Error, Result};

const API_ENDPOINT_ENV: &str = "SURVEY_API_ENDPOINT";
const SCHEMA_VERSION_ENV: &str = "SURVEY_SCHEMA_VERSION";
const SEND_INTERVAL_ENV: &str = "SURVEY_SEND_INTERVAL_MS";
const HTTP_TIMEOUT_ENV: &str = "SURVEY_HTTP_TIMEOUT_SECS";
const TABLE_NAME_ENV: &str = "SURVEY_TABLE";
const LOG_FORMAT_ENV: &str = "SURVEY_LOG_FORMAT";

const DEFAULT_SCHEMA_VERSION: &str = "your_version_here";
const DEFAULT_SEND_INTERVAL_MS: u64 = 1000;
const DEFAULT_TABLE_NAME: &str = "acn_db_user";

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Transport endpoint receiving each batch
    pub endpoint: String,
    /// Value written to every record's `Version`
    pub schema_version: String,
    /// Pause after each accepted batch
    pub send_interval: Duration,
    /// Per-request timeout; `None` keeps the client default
    pub http_timeout: Option<Duration>,
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(API_ENDPOINT_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{} is not set", API_ENDPOINT_ENV)))?;

        let schema_version =
            lookup(SCHEMA_VERSION_ENV).unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string());

        let send_interval = match lookup(SEND_INTERVAL_ENV) {
            Some(raw) => Duration::from_millis(parse_number(SEND_INTERVAL_ENV, &raw)?),
            None => Duration::from_millis(DEFAULT_SEND_INTERVAL_MS),
        };

        let http_timeout = lookup(HTTP_TIMEOUT_ENV)
            .map(|raw| parse_number(HTTP_TIMEOUT_ENV, &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            endpoint,
            schema_version,
            send_interval,
            http_timeout,
        })
    }
}

/// Consumer settings
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// DynamoDB table keyed by `userid`
    pub table_name: String,
}

impl ConsumerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup(TABLE_NAME_ENV).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        Self { table_name }
    }
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got {:?}", key, raw)))
}
