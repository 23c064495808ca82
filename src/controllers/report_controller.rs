use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::config::PlantConfig;
use crate::error::EngineError;
use crate::models::energy::AggregateReport;
use crate::models::orientation::{DirectionEntry, OrientationResponse};
use crate::models::series::{ReportRequest, SeriesPayload};
use crate::services::{azimuth, report_service};
use crate::shared_state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// Handler-level failure, rendered as a JSON error body.
#[derive(Debug)]
pub enum ApiError {
    PlantNotFound(String),
    Engine(EngineError),
    /// Body is not JSON or does not have the request's shape.
    InvalidBody(JsonRejection),
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::InvalidBody(e)
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::PlantNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse { error: format!("plant '{}' not found", id), kind: "PLANT_NOT_FOUND".to_string() },
            ),
            ApiError::Engine(e) => {
                warn!(kind = e.kind(), "report rejected: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse { error: e.to_string(), kind: e.kind().to_string() },
                )
            }
            ApiError::InvalidBody(rejection) => {
                warn!("request body rejected: {}", rejection.body_text());
                (
                    rejection.status(),
                    ErrorResponse { error: rejection.body_text(), kind: "INVALID_BODY".to_string() },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// GET /api/plants
/// List all configured plants
#[utoipa::path(
    get,
    path = "/api/plants",
    responses(
        (status = 200, description = "List of configured plants", body = Vec<PlantConfig>)
    )
)]
pub async fn list_plants(State(state): State<AppState>) -> Json<Vec<PlantConfig>> {
    Json(state.plants().to_vec())
}

/// GET /api/plants/{id}/orientation
/// Marker and facing-arrow geometry for a plant
///
/// The arrow bearing is derived from the same azimuth table as the direction label.
#[utoipa::path(
    get,
    path = "/api/plants/{id}/orientation",
    params(
        ("id" = String, Path, description = "Unique Plant ID")
    ),
    responses(
        (status = 200, description = "Plant orientation", body = OrientationResponse),
        (status = 404, description = "Plant not found", body = ErrorResponse)
    )
)]
pub async fn get_plant_orientation(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OrientationResponse>, ApiError> {
    let plant = state.plant(&id).ok_or_else(|| ApiError::PlantNotFound(id.clone()))?;
    let azimuth_deg = plant.azimuth_deg();
    Ok(Json(OrientationResponse {
        plant_id: plant.id.clone(),
        direction: azimuth::direction_entry(plant.direction),
        tilt_deg: plant.tilt_deg,
        marker: [plant.latitude, plant.longitude],
        arrow_tip: azimuth::arrow_tip(plant.latitude, plant.longitude, azimuth_deg),
    }))
}

/// POST /api/plants/{id}/report
/// Aggregate an hourly series for a configured plant
///
/// The body is the provider's hourly series; the plant's peak power, tilt and
/// direction are taken from the configuration.
#[utoipa::path(
    post,
    path = "/api/plants/{id}/report",
    params(
        ("id" = String, Path, description = "Unique Plant ID")
    ),
    request_body = SeriesPayload,
    responses(
        (status = 200, description = "Aggregated report", body = AggregateReport),
        (status = 404, description = "Plant not found", body = ErrorResponse),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 422, description = "Malformed record, empty series, invalid configuration or body of the wrong shape", body = ErrorResponse)
    )
)]
pub async fn post_plant_report(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Result<Json<SeriesPayload>, JsonRejection>,
) -> Result<Json<AggregateReport>, ApiError> {
    let Json(payload) = body?;
    let plant = state.plant(&id).ok_or_else(|| ApiError::PlantNotFound(id.clone()))?;
    let report = report_service::build_report(&plant.system(), &payload)?;
    Ok(Json(report))
}

/// POST /api/report
/// Aggregate an hourly series for ad-hoc system parameters
#[utoipa::path(
    post,
    path = "/api/report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Aggregated report", body = AggregateReport),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 422, description = "Malformed record, empty series, invalid configuration or body of the wrong shape", body = ErrorResponse)
    )
)]
pub async fn post_report(
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<AggregateReport>, ApiError> {
    let Json(request) = body?;
    let report = report_service::build_report(&request.system, &request.series)?;
    Ok(Json(report))
}

/// GET /api/directions
/// Direction label ↔ azimuth table
///
/// Azimuth is 0 = South, increasing westward; the provider aspect and map
/// bearing of each entry are listed alongside.
#[utoipa::path(
    get,
    path = "/api/directions",
    responses(
        (status = 200, description = "Direction table", body = Vec<DirectionEntry>)
    )
)]
pub async fn list_directions() -> Json<Vec<DirectionEntry>> {
    Json(azimuth::direction_table())
}
