//! API handlers for climate HTTP endpoints

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use server::{HealthCheck, HealthState};
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::models::*;
use crate::error::ClimateError;
use crate::service::ClimateService;
use crate::types::parse_iso_date;

pub const WELCOME: &str = "\
Welcome to the Climate Analysis API!
Available routes:
/api/v1.0/precipitation
/api/v1.0/stations
/api/v1.0/tobs
/api/v1.0/temp/<start>
/api/v1.0/temp/<start>/<end>
";

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

pub struct ClimateApiState {
    pub service: ClimateService,
    pub health: Arc<HealthState>,
}

impl ClimateApiState {
    /// Wire the service into the API, registering its store ping as the
    /// `database` health check.
    pub fn new(service_name: impl Into<String>, service: ClimateService) -> Self {
        let health = HealthState::new(service_name).with_check(Arc::new(service.clone()));
        Self {
            service,
            health: Arc::new(health),
        }
    }
}

#[async_trait]
impl HealthCheck for ClimateService {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.health_check().await.map_err(|e| e.to_string())
    }
}

fn api_error(err: ClimateError) -> ApiError {
    let status = match err {
        ClimateError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
        ClimateError::Storage(_) | ClimateError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        ClimateError::InvalidWindow(_) | ClimateError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if err.is_client_error() {
        debug!(%err, "Rejected request");
    } else {
        error!(%err, status = status.as_u16(), "Request failed");
    }

    (status, Json(ErrorResponse::new(err.code(), err.to_string())))
}

pub async fn welcome() -> &'static str {
    WELCOME
}

pub async fn precipitation(
    State(state): State<Arc<ClimateApiState>>,
) -> ApiResult<PrecipitationResponse> {
    let reference_date = state.service.window().reference_date;
    let precipitation = state
        .service
        .list_precipitation(reference_date)
        .await
        .map_err(api_error)?;

    Ok(Json(precipitation_response(precipitation)))
}

pub async fn stations(State(state): State<Arc<ClimateApiState>>) -> ApiResult<StationsResponse> {
    let stations = state.service.list_stations().await.map_err(api_error)?;
    Ok(Json(StationsResponse { stations }))
}

/// Last year of temperatures from the primary station.
pub async fn temperature_observations(
    State(state): State<Arc<ClimateApiState>>,
) -> ApiResult<TemperaturesResponse> {
    let window = state.service.window();
    let temps = state
        .service
        .list_temperature_observations(window.reference_date, &window.primary_station)
        .await
        .map_err(api_error)?;

    Ok(Json(TemperaturesResponse { temps }))
}

pub async fn stats_from(
    State(state): State<Arc<ClimateApiState>>,
    Path(start): Path<String>,
) -> ApiResult<TemperatureStatsResponse> {
    let start = parse_iso_date("start", &start).map_err(api_error)?;
    let stats = state
        .service
        .temperature_stats(start, None)
        .await
        .map_err(api_error)?;

    Ok(Json(stats.into()))
}

pub async fn stats_between(
    State(state): State<Arc<ClimateApiState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<TemperatureStatsResponse> {
    let start = parse_iso_date("start", &start).map_err(api_error)?;
    let end = parse_iso_date("end", &end).map_err(api_error)?;
    let stats = state
        .service
        .temperature_stats(start, Some(end))
        .await
        .map_err(api_error)?;

    Ok(Json(stats.into()))
}
