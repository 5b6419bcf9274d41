//! Climate query service.
//!
//! Each operation issues exactly one store query and shapes the result. No
//! state is kept between calls, so the service is shared freely across
//! request handlers.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{ClimateError, ClimateResult};
use crate::store::traits::{ClimateStore, ObservationQuery};
use crate::types::{DateRange, QueryWindow, TemperatureStats};

/// Precipitation keyed by date, ascending.
pub type PrecipitationByDate = BTreeMap<NaiveDate, Option<f64>>;

/// Stateless query service over a [`ClimateStore`].
#[derive(Clone)]
pub struct ClimateService {
    store: Arc<dyn ClimateStore>,
    window: QueryWindow,
    query_timeout: Duration,
}

impl ClimateService {
    pub fn new(store: Arc<dyn ClimateStore>, window: QueryWindow, query_timeout: Duration) -> Self {
        Self {
            store,
            window,
            query_timeout,
        }
    }

    /// Build a service from the dataset and database sections of the config.
    pub fn from_config(store: Arc<dyn ClimateStore>, config: &config::ApiConfig) -> Self {
        Self::new(
            store,
            QueryWindow::from(&config.dataset),
            Duration::from_secs(config.database.query_timeout_seconds),
        )
    }

    /// The configured trailing window.
    pub fn window(&self) -> &QueryWindow {
        &self.window
    }

    /// Run one store query under the configured timeout.
    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> ClimateResult<T>
    where
        F: Future<Output = ClimateResult<T>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout = ?self.query_timeout, "Store query timed out");
                Err(ClimateError::Timeout(self.query_timeout))
            }
        }
    }

    /// Precipitation for every observation in the window ending at `reference_date`.
    ///
    /// Several stations report on the same date; the last row in store order
    /// wins, including a null reading.
    #[instrument(skip(self))]
    pub async fn list_precipitation(
        &self,
        reference_date: NaiveDate,
    ) -> ClimateResult<PrecipitationByDate> {
        let since = self.window.start_for(reference_date)?;
        let observations = self
            .bounded(
                "list_precipitation",
                self.store
                    .find_observations_since(&ObservationQuery::since(since)),
            )
            .await?;

        let rows = observations.len();
        let precipitation: PrecipitationByDate = observations
            .into_iter()
            .map(|o| (o.date, o.precipitation))
            .collect();

        debug!(rows, dates = precipitation.len(), %since, "Listed precipitation");
        Ok(precipitation)
    }

    /// Distinct station ids in first-seen order.
    #[instrument(skip(self))]
    pub async fn list_stations(&self) -> ClimateResult<Vec<String>> {
        let stations = self
            .bounded("list_stations", self.store.find_all_stations())
            .await?;

        let mut seen = HashSet::new();
        let ids: Vec<String> = stations
            .into_iter()
            .map(|s| s.station_id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        debug!(stations = ids.len(), "Listed stations");
        Ok(ids)
    }

    /// Temperatures recorded by `station_id` in the window ending at `reference_date`.
    ///
    /// An unknown station yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_temperature_observations(
        &self,
        reference_date: NaiveDate,
        station_id: &str,
    ) -> ClimateResult<Vec<f64>> {
        let since = self.window.start_for(reference_date)?;
        let query = ObservationQuery::since(since).with_station(station_id);
        let observations = self
            .bounded(
                "list_temperature_observations",
                self.store.find_observations_since(&query),
            )
            .await?;

        let temps: Vec<f64> = observations.into_iter().map(|o| o.temperature).collect();
        debug!(observations = temps.len(), %since, "Listed temperature observations");
        Ok(temps)
    }

    /// Min/avg/max temperature for `start <= date <= end`.
    ///
    /// Without `end` the range is unbounded above. An inverted range is not an
    /// error; it matches nothing.
    #[instrument(skip(self))]
    pub async fn temperature_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> ClimateResult<TemperatureStats> {
        let range = DateRange { start, end };
        let stats = self
            .bounded("temperature_stats", self.store.aggregate_temperature(&range))
            .await?;

        debug!(?stats, "Computed temperature statistics");
        Ok(stats)
    }

    /// Probe the store.
    pub async fn health_check(&self) -> ClimateResult<()> {
        self.bounded("ping", self.store.ping()).await
    }
}
