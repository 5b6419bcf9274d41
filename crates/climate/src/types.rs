//! Core domain types for climate observations.
//!
//! Observations and stations are owned by the external data store and are
//! never mutated here. The remaining types describe the shape of a query.

use crate::error::{ClimateError, ClimateResult};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO calendar date format used on the wire and in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a zero-padded ISO `YYYY-MM-DD` date, naming the offending parameter
/// on failure.
pub fn parse_iso_date(param: &str, value: &str) -> ClimateResult<NaiveDate> {
    // chrono accepts unpadded fields; the store compares dates as text.
    if value.len() != 10 {
        return Err(ClimateError::invalid_date(param, value));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ClimateError::invalid_date(param, value))
}

/// One station's recorded precipitation and temperature for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier (e.g. "USC00519281").
    pub station_id: String,
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Precipitation, if recorded.
    pub precipitation: Option<f64>,
    /// Observed temperature.
    pub temperature: f64,
}

impl Observation {
    pub fn new(
        station_id: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            precipitation,
            temperature,
        }
    }
}

/// A fixed weather-recording location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier.
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Station {
    pub fn new(
        station_id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }
}

/// Inclusive date range. A missing `end` means the range has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Range from `start` with no upper bound.
    pub fn from(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Closed range `[start, end]`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Check if a date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

/// Min/avg/max temperature over a set of observations.
///
/// All three are `None` when the set is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureStats {
    /// Aggregate a sequence of temperatures.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            avg: Some(sum / count as f64),
            max: Some(max),
        }
    }

    /// True when no rows contributed to the aggregate.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.avg.is_none() && self.max.is_none()
    }

    /// `[min, avg, max]`, the order the API emits.
    pub fn as_array(&self) -> [Option<f64>; 3] {
        [self.min, self.avg, self.max]
    }
}

/// The trailing window that the precipitation and tobs queries look back over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    /// Most recent date in the dataset.
    pub reference_date: NaiveDate,
    /// Number of days to look back from the reference date.
    pub window_days: u32,
    /// Station with the most historical observations.
    pub primary_station: String,
}

impl QueryWindow {
    pub fn new(
        reference_date: NaiveDate,
        window_days: u32,
        primary_station: impl Into<String>,
    ) -> Self {
        Self {
            reference_date,
            window_days,
            primary_station: primary_station.into(),
        }
    }

    /// First date inside the window that ends at `reference_date`.
    pub fn start_for(&self, reference_date: NaiveDate) -> ClimateResult<NaiveDate> {
        reference_date
            .checked_sub_days(Days::new(u64::from(self.window_days)))
            .ok_or_else(|| {
                ClimateError::InvalidWindow(format!(
                    "{} days before {} is out of range",
                    self.window_days, reference_date
                ))
            })
    }
}

impl From<&config::DatasetConfig> for QueryWindow {
    fn from(dataset: &config::DatasetConfig) -> Self {
        Self::new(
            dataset.reference_date,
            dataset.window_days,
            dataset.primary_station.clone(),
        )
    }
}
