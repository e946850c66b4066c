//! HTTP transport for the generator
//!
//! Posts each batch as a JSON array to the API Gateway endpoint that feeds
//! the queue. One `reqwest::Client` is built at cold start and reused.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::errors::Result;
use crate::generator::{Transport, TransportReply};
use crate::models::SurveyResponse;

/// API Gateway transport
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build the client from generator configuration
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Wrap an existing client (for testing)
    pub fn with_client(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_batch(&self, batch: &[SurveyResponse]) -> Result<TransportReply> {
        let body = serde_json::to_vec(batch)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, records = batch.len(), "Transport replied");

        Ok(TransportReply { status, body })
    }
}
