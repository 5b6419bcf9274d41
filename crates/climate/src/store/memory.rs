//! In-memory climate store implementation

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::ClimateResult;
use crate::store::traits::{ClimateStore, ObservationQuery};
use crate::types::{DateRange, Observation, Station, TemperatureStats};

/// In-memory climate store for testing and development
///
/// Rows are kept in insertion order, which stands in for relational row order.
#[derive(Debug, Default)]
pub struct InMemoryClimateStore {
    observations: RwLock<Vec<Observation>>,
    stations: RwLock<Vec<Station>>,
}

impl InMemoryClimateStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows
    pub fn with_data(observations: Vec<Observation>, stations: Vec<Station>) -> Self {
        Self {
            observations: RwLock::new(observations),
            stations: RwLock::new(stations),
        }
    }

    /// Append an observation
    pub fn insert_observation(&self, observation: Observation) {
        self.observations.write().push(observation);
    }

    /// Append a station
    pub fn insert_station(&self, station: Station) {
        self.stations.write().push(station);
    }

    /// Number of observations held
    pub fn observation_count(&self) -> usize {
        self.observations.read().len()
    }
}

#[async_trait]
impl ClimateStore for InMemoryClimateStore {
    async fn find_observations_since(
        &self,
        query: &ObservationQuery,
    ) -> ClimateResult<Vec<Observation>> {
        let observations = self.observations.read();
        Ok(observations
            .iter()
            .filter(|o| query.matches(o))
            .cloned()
            .collect())
    }

    async fn find_all_stations(&self) -> ClimateResult<Vec<Station>> {
        Ok(self.stations.read().clone())
    }

    async fn aggregate_temperature(&self, range: &DateRange) -> ClimateResult<TemperatureStats> {
        let observations = self.observations.read();
        Ok(TemperatureStats::from_values(
            observations
                .iter()
                .filter(|o| range.contains(o.date))
                .map(|o| o.temperature),
        ))
    }

    async fn ping(&self) -> ClimateResult<()> {
        Ok(())
    }
}
