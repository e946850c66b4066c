//! SurveyPipeline API client for testing

use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use survey_pipeline_core::SurveyResponse;

/// Client for the API Gateway route that feeds the queue
pub struct SurveyApiClient {
    client: Client,
    base_url: String,
}

/// Result type for API responses
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with status code and body
    Http { status: StatusCode, body: String },
    /// Network or serialization error
    Request(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl SurveyApiClient {
    /// Create a new client with the given stage URL
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from environment variable
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let base_url =
            std::env::var("SURVEY_API_URL").expect("SURVEY_API_URL environment variable not set");
        Self::new(&base_url)
    }

    /// Full URL of the ingest route
    pub fn ingest_url(&self) -> String {
        format!("{}/randomdata", self.base_url)
    }

    /// Send a batch of survey responses, as the generator does
    pub async fn send_batch(&self, batch: &[SurveyResponse]) -> ApiResult<String> {
        self.post("/randomdata", batch).await
    }

    /// Send a single survey response object (not wrapped in an array)
    pub async fn send_one(&self, record: &SurveyResponse) -> ApiResult<String> {
        self.post("/randomdata", record).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if status == StatusCode::OK {
            Ok(body)
        } else {
            Err(ApiError::Http { status, body })
        }
    }
}
