//! Queue consumer: decode messages and upsert user rows
//!
//! Each queue body holds either one record or an array of records. Every
//! record ends in exactly one [`UpsertOutcome`]; none of them fails the batch.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use tracing::{error, info, warn};

use crate::errors::{Error, Result};
use crate::models::StoredUserRecord;

/// Keyed user table
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Replace `Version` and `response` of an existing row.
    /// Returns [`Error::UserNotFound`] when no row has the key.
    async fn update_user(&self, record: &StoredUserRecord) -> Result<()>;

    /// Write a new row
    async fn insert_user(&self, record: &StoredUserRecord) -> Result<()>;
}

/// Why a message was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Queue record carried no body
    EmptyBody,
    /// Body was not valid JSON
    InvalidJson(String),
    /// Decoded message was not a JSON object
    NotAnObject,
    /// Required fields absent or falsy
    MissingFields(Vec<&'static str>),
    /// Field present but of the wrong type
    InvalidField(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyBody => write!(f, "message has no body"),
            SkipReason::InvalidJson(e) => write!(f, "body is not valid JSON: {}", e),
            SkipReason::NotAnObject => write!(f, "message is not a JSON object"),
            SkipReason::MissingFields(fields) => write!(f, "missing {}", fields.join(", ")),
            SkipReason::InvalidField(field) => write!(f, "{} must be a string", field),
        }
    }
}

/// Terminal state of one message
#[derive(Debug)]
pub enum UpsertOutcome {
    Updated,
    Inserted,
    Skipped(SkipReason),
    Failed(Error),
}

/// Per-batch outcome counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub updated: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn record(&mut self, outcome: &UpsertOutcome) {
        match outcome {
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Skipped(_) => self.skipped += 1,
            UpsertOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.updated + self.inserted + self.skipped + self.failed
    }
}

/// Split a queue body into messages; an array yields one message per element
pub fn decode_body(body: &str) -> std::result::Result<Vec<Value>, SkipReason> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(value) => Ok(vec![value]),
        Err(e) => Err(SkipReason::InvalidJson(e.to_string())),
    }
}

/// Extract `userid`, `Version` and `response` from a decoded message
pub fn parse_message(message: &Value) -> std::result::Result<StoredUserRecord, SkipReason> {
    let Value::Object(fields) = message else {
        return Err(SkipReason::NotAnObject);
    };

    let user_id = fields.get("userid").filter(|v| is_truthy(v));
    let version = fields.get("Version").filter(|v| is_truthy(v));
    let response = fields.get("response").filter(|v| is_truthy(v));

    let (Some(user_id), Some(version), Some(response)) = (user_id, version, response) else {
        let missing = [("userid", user_id), ("Version", version), ("response", response)]
            .into_iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| name)
            .collect();
        return Err(SkipReason::MissingFields(missing));
    };

    let user_id = user_id.as_str().ok_or(SkipReason::InvalidField("userid"))?;
    let version = version.as_str().ok_or(SkipReason::InvalidField("Version"))?;

    Ok(StoredUserRecord {
        user_id: user_id.to_string(),
        version: version.to_string(),
        response: response.clone(),
    })
}

/// Falsy: null, false, zero, empty string, empty array, empty object
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Upsert one decoded message: update, falling back to insert when the row is absent
pub async fn process_message<S: UserStore + ?Sized>(store: &S, message: &Value) -> UpsertOutcome {
    let record = match parse_message(message) {
        Ok(record) => record,
        Err(reason) => {
            warn!(reason = %reason, message = %message, "Missing data in message");
            return UpsertOutcome::Skipped(reason);
        }
    };

    match store.update_user(&record).await {
        Ok(()) => {
            info!(user_id = %record.user_id, "Updated user");
            UpsertOutcome::Updated
        }
        Err(Error::UserNotFound(_)) => {
            info!(user_id = %record.user_id, "No item found, creating a new item");
            match store.insert_user(&record).await {
                Ok(()) => UpsertOutcome::Inserted,
                Err(e) => {
                    error!(user_id = %record.user_id, error = %e, "Failed to insert item");
                    UpsertOutcome::Failed(e)
                }
            }
        }
        Err(e) => {
            error!(user_id = %record.user_id, error = %e, "Failed to update item");
            UpsertOutcome::Failed(e)
        }
    }
}

/// Process every message carried by one queue body, in order
pub async fn process_body<S: UserStore + ?Sized>(store: &S, body: Option<&str>) -> Vec<UpsertOutcome> {
    let Some(body) = body else {
        warn!("Queue record has no body");
        return vec![UpsertOutcome::Skipped(SkipReason::EmptyBody)];
    };

    let messages = match decode_body(body) {
        Ok(messages) => messages,
        Err(reason) => {
            warn!(reason = %reason, "Undecodable queue body");
            return vec![UpsertOutcome::Skipped(reason)];
        }
    };

    let mut outcomes = Vec::with_capacity(messages.len());
    for message in &messages {
        outcomes.push(process_message(store, message).await);
    }
    outcomes
}

/// Process a delivery batch sequentially and summarize the outcomes
pub async fn process_batch<'a, S, I>(store: &S, bodies: I) -> BatchReport
where
    S: UserStore + ?Sized,
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut report = BatchReport::default();
    for body in bodies {
        for outcome in process_body(store, body).await {
            report.record(&outcome);
        }
    }

    info!(
        updated = report.updated,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "Batch processed"
    );
    report
}
