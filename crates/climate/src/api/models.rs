//! API models for climate HTTP endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::service::PrecipitationByDate;
use crate::types::{TemperatureStats, DATE_FORMAT};

/// `{"YYYY-MM-DD": prcp | null, ...}` in ascending date order
pub type PrecipitationResponse = BTreeMap<String, Option<f64>>;

pub fn precipitation_response(precipitation: PrecipitationByDate) -> PrecipitationResponse {
    precipitation
        .into_iter()
        .map(|(date, prcp)| (date.format(DATE_FORMAT).to_string(), prcp))
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemperaturesResponse {
    pub temps: Vec<f64>,
}

/// `{"temps": [min, avg, max]}`; all three are null when no rows matched.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemperatureStatsResponse {
    pub temps: [Option<f64>; 3],
}

impl From<TemperatureStats> for TemperatureStatsResponse {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            temps: stats.as_array(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
