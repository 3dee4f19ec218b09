use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cavi_core::config::{delay_range_from_env_values, max_in_flight_from_env_value};
use cavi_core::constants::{DEFAULT_BACKEND_TOKEN, DEFAULT_BACKEND_URL};
use cavi_core::{CalculationDispatcher, CalculatorConfig};

/// Main entry point for the CAVI calculator service
///
/// Resolves configuration once from the environment, then serves the REST API. Calculations
/// run in the background and deliver their results to the Go backend.
///
/// # Environment Variables
/// - `CAVI_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `GO_BACKEND_URL`: Backend base URL for result delivery (default: "http://localhost:8080")
/// - `GO_BACKEND_TOKEN`: Shared secret sent with every delivery
/// - `CALCULATION_DELAY_MIN` / `CALCULATION_DELAY_MAX`: Simulated delay bounds in seconds (default: 5 / 10)
/// - `CAVI_MAX_IN_FLIGHT`: Maximum concurrently running calculations (default: 256)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cavi_run=info".parse()?)
                .add_directive("cavi_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CAVI_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let backend_url =
        std::env::var("GO_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
    let backend_token =
        std::env::var("GO_BACKEND_TOKEN").unwrap_or_else(|_| DEFAULT_BACKEND_TOKEN.into());
    let delay = delay_range_from_env_values(
        std::env::var("CALCULATION_DELAY_MIN").ok(),
        std::env::var("CALCULATION_DELAY_MAX").ok(),
    )?;
    let max_in_flight = max_in_flight_from_env_value(std::env::var("CAVI_MAX_IN_FLIGHT").ok())?;

    let cfg = Arc::new(CalculatorConfig::new(
        &backend_url,
        backend_token,
        delay,
        max_in_flight,
    )?);

    tracing::info!("++ Starting CAVI calculator on {}", rest_addr);
    tracing::info!(
        "++ Delivering to {} (delay {}-{}s, max {} in flight)",
        cfg.backend_url(),
        delay.min_secs(),
        delay.max_secs(),
        cfg.max_in_flight()
    );

    let dispatcher = CalculationDispatcher::new(cfg)?;
    api_rest::serve(&rest_addr, dispatcher).await
}
