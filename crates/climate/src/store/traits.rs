//! ClimateStore trait definition
//!
//! The trait replaces runtime schema reflection with explicit typed records
//! and a narrow read-only interface. Storage adapters implement it; the
//! query service never touches a connection directly.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ClimateResult;
use crate::types::{DateRange, Observation, Station, TemperatureStats};

/// Filters for selecting observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    /// Only observations on or after this date.
    pub since: NaiveDate,
    /// Only observations recorded by this station.
    pub station: Option<String>,
}

impl ObservationQuery {
    /// Select every observation on or after `since`.
    pub fn since(since: NaiveDate) -> Self {
        Self {
            since,
            station: None,
        }
    }

    /// Restrict to a single station.
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    /// Check if an observation matches this query.
    pub fn matches(&self, observation: &Observation) -> bool {
        if observation.date < self.since {
            return false;
        }

        if let Some(ref station) = self.station {
            if observation.station_id != *station {
                return false;
            }
        }

        true
    }
}

/// ClimateStore trait - read-only access to observations and stations
///
/// Results come back in store order (insertion order for the in-memory store,
/// rowid order for SQLite). Callers rely on that order for "last write wins"
/// and "first seen" semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClimateStore: Send + Sync {
    /// Observations matching `query`, in store order.
    async fn find_observations_since(
        &self,
        query: &ObservationQuery,
    ) -> ClimateResult<Vec<Observation>>;

    /// Every station row, in store order. Station ids may repeat if the
    /// underlying table does not enforce uniqueness.
    async fn find_all_stations(&self) -> ClimateResult<Vec<Station>>;

    /// Min/avg/max temperature over observations whose date falls in `range`.
    async fn aggregate_temperature(&self, range: &DateRange) -> ClimateResult<TemperatureStats>;

    /// Verify the store is reachable.
    async fn ping(&self) -> ClimateResult<()>;
}
