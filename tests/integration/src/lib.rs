//! SurveyPipeline Integration Tests
//!
//! These tests run against a deployed stack:
//! - `SURVEY_API_URL`: API Gateway stage URL fronting the queue
//! - `SURVEY_TABLE`: user table written by the consumer (default `acn_db_user`)
//!
//! A `.env` file in the working directory is honored.
//!
//! Run with: cargo test --package survey-pipeline-integration-tests

pub mod client;

pub use client::SurveyApiClient;
pub use fixtures::*;
