//! # API REST
//!
//! REST API implementation for the CAVI calculator.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON rejections, status codes, CORS)
//!
//! Uses `api-shared` for response bodies and `cavi-core` for validation and dispatch.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{AcceptedRes, CalculateReq, ErrorRes, GroupReq, HealthRes, HealthService};
use cavi_core::{CalculationDispatcher, CalculationRequest, CaviError};

/// Application state shared across REST API handlers.
#[derive(Clone)]
struct AppState {
    dispatcher: CalculationDispatcher,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, calculate),
    components(schemas(AcceptedRes, CalculateReq, ErrorRes, GroupReq, HealthRes))
)]
struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Build the REST router around a dispatcher.
///
/// Routes:
/// - `POST /api/calculate`
/// - `GET /api/health`
/// - `GET /api-docs/openapi.json` and `/swagger-ui`
pub fn router(dispatcher: CalculationDispatcher) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/calculate", post(calculate))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { dispatcher })
}

/// Bind `addr` and serve the REST API until the server fails.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(addr: &str, dispatcher: CalculationDispatcher) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- CAVI REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(dispatcher)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/api/calculate",
    request_body = CalculateReq,
    responses(
        (status = 202, description = "Calculation started", body = AcceptedRes),
        (status = 400, description = "Missing field, empty groups or malformed body", body = ErrorRes),
        (status = 503, description = "Too many calculations in flight", body = ErrorRes)
    )
)]
/// Start an asynchronous CAVI calculation
///
/// Validates the request shape, hands the calculation to the dispatcher and answers at once.
/// Results are delivered to the backend later; the caller receives no further signal.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON or not an object,
/// - a required field is missing or has an unusable type, or
/// - `groups` is empty.
///
/// Returns `503 Service Unavailable` if the admission limit is reached.
#[axum::debug_handler]
async fn calculate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<AcceptedRes>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!("Rejected calculation body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes::new(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))),
        )
    })?;

    let calculation_id = body.get("calculation_id").cloned().unwrap_or(Value::Null);
    let request = CalculationRequest::from_json(body).map_err(reject)?;
    let groups_count = request.groups.len();

    state.dispatcher.submit(request).map_err(reject)?;
    tracing::info!(
        %calculation_id,
        groups_count,
        "Accepted CAVI calculation"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedRes::new(calculation_id, groups_count)),
    ))
}

fn reject(err: CaviError) -> ApiError {
    let status = match err {
        ref e if e.is_client_error() => StatusCode::BAD_REQUEST,
        CaviError::AtCapacity { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("Calculation not started ({}): {}", status, err);
    (status, Json(ErrorRes::new(err.to_string())))
}
