//! tonewatch Lambda function.
//!
//! Triggered by an SQS event-source mapping whose messages are S3 upload
//! notifications. Each uploaded audio file is transcribed, its sentiment is
//! recorded in DynamoDB, and negative results raise an SMS alert.

mod aws;
mod config;
mod error;
#[cfg(test)]
mod fakes;
mod handler;
mod pipeline;
mod state;

use lambda_runtime::{service_fn, Error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, state::HandlerState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Lambda adds its own timestamps to every log line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonewatch_lambda=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(false)
                .without_time(),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        table = %config.table_name,
        alerts_enabled = config.alert_phone_number.is_some(),
        poll_interval_ms = config.poll_interval_ms,
        "Starting handler"
    );

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let state = HandlerState::from_sdk_config(&sdk_config, config);

    lambda_runtime::run(service_fn(|event| handler::handle_request(event, &state))).await
}
