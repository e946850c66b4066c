//! SurveyPipeline Consumer Lambda
//!
//! Triggered by SQS. Every message body holds one survey response or an array
//! of them; each is upserted into the user table keyed by `userid`.
//! Individual failures are logged and never fail the batch.

use aws_config::BehaviorVersion;
use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use survey_pipeline_core::{
    process_batch, ConsumerConfig, DynamoClient, InvocationResponse, LogFormat, UserStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler<S: UserStore + ?Sized>(
    store: &S,
    event: LambdaEvent<SqsEvent>,
) -> Result<InvocationResponse, LambdaError> {
    let (payload, _context) = event.into_parts();

    info!(record_count = payload.records.len(), "Processing SQS batch");

    process_batch(store, payload.records.iter().map(|r| r.body.as_deref())).await;

    Ok(InvocationResponse::json(200, "Request was successful")?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    init_tracing();

    // One client per process, shared by every invocation
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = DynamoClient::new(aws_sdk_dynamodb::Client::new(&config), &ConsumerConfig::from_env());
    info!(table = %client.table_name(), "Consumer initialized");

    let client = &client;
    run(service_fn(move |event: LambdaEvent<SqsEvent>| async move {
        handler(client, event).await
    }))
    .await
}
