//! Synthetic survey data generator
//!
//! Builds `M` random survey responses per iteration, posts each batch to the
//! transport endpoint and pauses between iterations, `N` times in total.
//! The first rejected or failed POST aborts the run; batches already accepted
//! stay accepted.

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info};

use crate::errors::{Error, Result};
use crate::models::{ErrorResponse, GenerateSuccess, InvocationResponse, SurveyResponse};

const USER_ID_LEN: usize = 6;
const MAX_QUESTIONS: usize = 10;
const ANSWER_CHOICES: u8 = 3;

/// Validated generator input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRequest {
    /// `N`: number of iterations (seconds)
    pub duration_secs: u64,
    /// `M`: records per iteration
    pub records_per_sec: u64,
}

impl GenerateRequest {
    /// Parse `{"N": .., "M": ..}`; each value may be a JSON integer or a numeric string
    pub fn from_event(event: &Value) -> Result<Self> {
        let (Some(n), Some(m)) = (event.get("N"), event.get("M")) else {
            return Err(Error::MissingInput);
        };

        Ok(Self {
            duration_secs: parse_positive("N", n)?,
            records_per_sec: parse_positive("M", m)?,
        })
    }

    /// Total number of records a successful run produces
    pub fn total_records(&self) -> u64 {
        self.duration_secs.saturating_mul(self.records_per_sec)
    }
}

fn parse_positive(field: &str, value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v > 0 => Ok(v),
        _ => Err(Error::Validation(format!(
            "{} must be a positive integer, got {}",
            field, value
        ))),
    }
}

/// Produces random survey responses stamped with a fixed schema version
#[derive(Debug, Clone)]
pub struct RecordFactory {
    version: String,
}

impl RecordFactory {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Generate one record
    pub fn record<R: Rng + ?Sized>(&self, rng: &mut R) -> SurveyResponse {
        let user_id: String = (0..USER_ID_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();

        let questions = rng.gen_range(1..=MAX_QUESTIONS);
        let response = (1..=questions)
            .map(|idx| {
                let answer = rng.gen_range(1..=ANSWER_CHOICES);
                (format!("q{}", idx), format!("value{}", answer))
            })
            .collect::<BTreeMap<_, _>>();

        SurveyResponse {
            version: self.version.clone(),
            user_id,
            response,
        }
    }

    /// Generate `size` records
    pub fn batch<R: Rng + ?Sized>(&self, rng: &mut R, size: u64) -> Vec<SurveyResponse> {
        (0..size).map(|_| self.record(rng)).collect()
    }
}

/// Status and body text returned by the transport endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

/// Delivers one batch of records to the transport endpoint
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST the batch as a JSON array. Transport-level failures are `Err`;
    /// any HTTP status, including errors, is an `Ok` reply.
    async fn post_batch(&self, batch: &[SurveyResponse]) -> Result<TransportReply>;
}

/// Runs the generate-send-pause loop against a transport
pub struct Generator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    factory: RecordFactory,
    interval: Duration,
}

impl<'a, T: Transport + ?Sized> Generator<'a, T> {
    pub fn new(transport: &'a T, factory: RecordFactory, interval: Duration) -> Self {
        Self {
            transport,
            factory,
            interval,
        }
    }

    /// Run with a freshly seeded RNG
    pub async fn run(&self, request: &GenerateRequest) -> Result<Vec<SurveyResponse>> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(request, &mut rng).await
    }

    /// Run the loop, returning every record sent across all iterations
    pub async fn run_with_rng<R: Rng + Send>(
        &self,
        request: &GenerateRequest,
        rng: &mut R,
    ) -> Result<Vec<SurveyResponse>> {
        let mut output = Vec::new();

        for iteration in 0..request.duration_secs {
            let batch = self.factory.batch(rng, request.records_per_sec);

            let reply = match self.transport.post_batch(&batch).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(iteration, accepted_batches = iteration, error = %e, "Transport failure, aborting run");
                    return Err(e);
                }
            };

            if reply.status != 200 {
                error!(
                    iteration,
                    accepted_batches = iteration,
                    status = reply.status,
                    "Transport rejected batch, aborting run"
                );
                return Err(Error::TransportStatus {
                    status: reply.status,
                    details: reply.body,
                });
            }

            info!(iteration, batch_size = batch.len(), "Batch accepted");
            output.extend(batch);

            if !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }

        info!(
            iterations = request.duration_secs,
            records = output.len(),
            "Generator run complete"
        );
        Ok(output)
    }
}

/// Map a run outcome to the Lambda result envelope
pub fn respond(outcome: Result<Vec<SurveyResponse>>) -> Result<InvocationResponse> {
    match outcome {
        Ok(records) => InvocationResponse::json(200, &GenerateSuccess::new(records)),
        Err(e @ (Error::MissingInput | Error::Validation(_))) => {
            InvocationResponse::json(e.status_code(), &e.to_string())
        }
        Err(Error::TransportStatus { status, details }) => InvocationResponse::json(
            status,
            &ErrorResponse::new("Failed to send data to API Gateway", details),
        ),
        Err(Error::Http(details)) => {
            InvocationResponse::json(500, &ErrorResponse::new("Exception occurred", details))
        }
        Err(e) => InvocationResponse::json(500, &ErrorResponse::new("Exception occurred", e.to_string())),
    }
}
