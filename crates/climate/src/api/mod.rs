//! HTTP API for climate queries

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::ClimateApiState;
pub use routes::climate_routes;
