//! # Climate Crate
//!
//! Read-only query layer over a climate-observation dataset: daily
//! precipitation and temperature observations recorded per weather station.
//!
//! ## Key Components
//!
//! - **Domain Types**: `Observation`, `Station`, `DateRange`, `TemperatureStats`, `QueryWindow`
//! - **Traits**: `ClimateStore` for storage abstraction
//! - **Service**: `ClimateService`, the four query operations behind the API
//! - **In-Memory Store**: Default implementation for testing and development
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  HTTP API (axum)                     │
//! │  /api/v1.0/precipitation  /stations  /tobs  /temp    │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                   ClimateService                     │
//! │  list_precipitation  list_stations                   │
//! │  list_temperature_observations  temperature_stats    │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │            ClimateStore (trait)                      │
//! │  InMemoryClimateStore │ SqliteClimateStore           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Feature Flags
//!
//! - `sqlite` - Enable the SQLite-backed store
//! - `api` - Enable the HTTP API

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for convenience
pub use error::{ClimateError, ClimateResult};
pub use service::{ClimateService, PrecipitationByDate};
pub use store::memory::InMemoryClimateStore;
pub use store::traits::{ClimateStore, ObservationQuery};
pub use types::{
    parse_iso_date, DateRange, Observation, QueryWindow, Station, TemperatureStats,
};

#[cfg(feature = "sqlite")]
pub use store::sqlite::SqliteClimateStore;

#[cfg(feature = "api")]
pub use api::{climate_routes, ClimateApiState};
