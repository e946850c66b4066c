//! SurveyPipeline Generator Lambda
//!
//! Invoked with `{"N": .., "M": ..}`. Sends `M` synthetic survey responses per
//! second to the API Gateway endpoint for `N` seconds and returns every record
//! it sent.

use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use serde_json::Value;
use survey_pipeline_core::generator::respond;
use survey_pipeline_core::{
    GenerateRequest, Generator, GeneratorConfig, HttpTransport, InvocationResponse, LogFormat,
    RecordFactory, Transport,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

async fn handler<T: Transport + ?Sized>(
    transport: &T,
    config: &GeneratorConfig,
    event: LambdaEvent<Value>,
) -> Result<InvocationResponse, LambdaError> {
    let (payload, _context) = event.into_parts();

    let outcome = match GenerateRequest::from_event(&payload) {
        Ok(request) => {
            info!(
                duration_secs = request.duration_secs,
                records_per_sec = request.records_per_sec,
                "Starting generator run"
            );
            let factory = RecordFactory::new(config.schema_version.clone());
            Generator::new(transport, factory, config.send_interval)
                .run(&request)
                .await
        }
        Err(e) => {
            warn!(error = %e, "Rejected generator request");
            Err(e)
        }
    };

    Ok(respond(outcome)?)
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

    let config = GeneratorConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    info!(endpoint = %transport.endpoint(), "Generator initialized");

    let (config, transport) = (&config, &transport);
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(transport, config, event).await
    }))
    .await
}
