//! SurveyPipeline Core Library
//!
//! Shared functionality for the SurveyPipeline Lambda functions including:
//! - Domain models
//! - Synthetic data generation and the HTTP transport
//! - Queue message decoding and the user upsert
//! - DynamoDB operations
//! - Configuration and error types

pub mod config;
pub mod consumer;
pub mod dynamo;
pub mod errors;
pub mod generator;
pub mod http;
pub mod models;

pub use config::{ConsumerConfig, GeneratorConfig, LogFormat};
pub use consumer::{process_batch, process_message, BatchReport, SkipReason, UpsertOutcome, UserStore};
pub use dynamo::DynamoClient;
pub use errors::{Error, Result};
pub use generator::{GenerateRequest, Generator, RecordFactory, Transport, TransportReply};
pub use http::HttpTransport;
pub use models::*;
