//! API routes for climate queries

use axum::{routing::get, Router};
use server::health_routes;
use std::sync::Arc;

use crate::api::handlers::*;

/// Create the climate router, including `/health` and `/health/detailed`.
pub fn climate_routes(state: Arc<ClimateApiState>) -> Router {
    let health = health_routes(state.health.clone());

    Router::new()
        .route("/", get(welcome))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(temperature_observations))
        .route("/api/v1.0/temp/:start", get(stats_from))
        .route("/api/v1.0/temp/:start/:end", get(stats_between))
        .with_state(state)
        .merge(health)
}
