use lambda_http::{run, service_fn, Error};
use tracing_subscriber::EnvFilter;

mod config;
mod http_handler;
mod record;
mod store;

use config::Config;
use http_handler::function_handler;
use store::DynamoStore;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // CloudWatch stamps ingestion time
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoStore::new(aws_sdk_dynamodb::Client::new(&sdk_config));

    run(service_fn(|event| {
        function_handler(&store, &config, &new_id, event)
    }))
    .await
}
