use function::{handle, HandlerConfig, Response};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

async fn function_handler(
    event: LambdaEvent<Value>,
    config: &HandlerConfig,
) -> Result<Response, Error> {
    // The context carries platform metadata only, nothing in it drives the logic
    tracing::debug!(request_id = %event.context.request_id, "Invocation");

    match handle(&event.payload, config) {
        Ok(response) => Ok(response),
        Err(err) => {
            tracing::error!("Error occurred while handling request: {err:?}");
            Err(err.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // The platform stamps each log line already
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let config = HandlerConfig::from_env();
    tracing::info!(service = config.service_name(), "Serving requests");

    run(service_fn(|event| function_handler(event, &config))).await
}
