//! SQLite implementation of the `ClimateStore` trait.
//!
//! Reads the `measurement` and `station` tables of an existing dataset:
//!
//! ```text
//! measurement(id, station, date TEXT 'YYYY-MM-DD', prcp REAL NULL, tobs REAL)
//! station(id, station, name, latitude, longitude, elevation)
//! ```
//!
//! The database is opened read-only and is never created or migrated. Each
//! query checks a connection out of the pool, so concurrent requests never
//! share a session.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::{ClimateError, ClimateResult};
use crate::store::traits::{ClimateStore, ObservationQuery};
use crate::types::{DateRange, Observation, Station, TemperatureStats, DATE_FORMAT};

/// SQLite-backed climate store.
#[derive(Debug, Clone)]
pub struct SqliteClimateStore {
    pool: SqlitePool,
}

impl SqliteClimateStore {
    /// Open a read-only connection pool to the dataset described by `database`.
    pub async fn connect(database: &config::DatabaseConfig) -> ClimateResult<Self> {
        let options = SqliteConnectOptions::from_str(&database.url)
            .map_err(|e| {
                ClimateError::Storage(format!("Invalid database URL '{}': {}", database.url, e))
            })?
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| ClimateError::Storage(format!("Failed to open database: {}", e)))?;

        info!(
            url = %database.url,
            max_connections = database.max_connections,
            "Connected to climate database"
        );

        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn row_to_observation(row: &SqliteRow) -> ClimateResult<Observation> {
        let date: String = row.try_get("date")?;
        Ok(Observation {
            station_id: row.try_get("station")?,
            date: parse_stored_date(&date)?,
            precipitation: row.try_get("prcp")?,
            temperature: row.try_get("tobs")?,
        })
    }

    fn row_to_station(row: &SqliteRow) -> ClimateResult<Station> {
        let name: Option<String> = row.try_get("name")?;
        Ok(Station {
            station_id: row.try_get("station")?,
            name: name.unwrap_or_default(),
            latitude: row.try_get::<Option<f64>, _>("latitude")?.unwrap_or_default(),
            longitude: row.try_get::<Option<f64>, _>("longitude")?.unwrap_or_default(),
            elevation: row.try_get::<Option<f64>, _>("elevation")?.unwrap_or_default(),
        })
    }
}

/// Dates are stored as TEXT; a malformed row is a data-store fault.
fn parse_stored_date(value: &str) -> ClimateResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| ClimateError::Storage(format!("Malformed date '{}' in store: {}", value, e)))
}

fn bind_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl ClimateStore for SqliteClimateStore {
    #[instrument(skip(self))]
    async fn find_observations_since(
        &self,
        query: &ObservationQuery,
    ) -> ClimateResult<Vec<Observation>> {
        let rows = match query.station {
            Some(ref station) => {
                sqlx::query(
                    r#"
                    SELECT station, date, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs
                    FROM measurement
                    WHERE date >= ?1 AND station = ?2
                    ORDER BY rowid
                    "#,
                )
                .bind(bind_date(query.since))
                .bind(station)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT station, date, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs
                    FROM measurement
                    WHERE date >= ?1
                    ORDER BY rowid
                    "#,
                )
                .bind(bind_date(query.since))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(rows = rows.len(), "Fetched observations");
        rows.iter().map(Self::row_to_observation).collect()
    }

    #[instrument(skip(self))]
    async fn find_all_stations(&self) -> ClimateResult<Vec<Station>> {
        let rows = sqlx::query(
            r#"
            SELECT station, name,
                   CAST(latitude AS REAL) AS latitude,
                   CAST(longitude AS REAL) AS longitude,
                   CAST(elevation AS REAL) AS elevation
            FROM station
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched stations");
        rows.iter().map(Self::row_to_station).collect()
    }

    #[instrument(skip(self))]
    async fn aggregate_temperature(&self, range: &DateRange) -> ClimateResult<TemperatureStats> {
        let row = match range.end {
            Some(end) => {
                sqlx::query(
                    r#"
                    SELECT CAST(MIN(tobs) AS REAL) AS min_tobs,
                           CAST(AVG(tobs) AS REAL) AS avg_tobs,
                           CAST(MAX(tobs) AS REAL) AS max_tobs
                    FROM measurement
                    WHERE date >= ?1 AND date <= ?2
                    "#,
                )
                .bind(bind_date(range.start))
                .bind(bind_date(end))
                .fetch_one(&self.pool)
                .await?
            }
            // No upper bound: the end filter is skipped entirely.
            None => {
                sqlx::query(
                    r#"
                    SELECT CAST(MIN(tobs) AS REAL) AS min_tobs,
                           CAST(AVG(tobs) AS REAL) AS avg_tobs,
                           CAST(MAX(tobs) AS REAL) AS max_tobs
                    FROM measurement
                    WHERE date >= ?1
                    "#,
                )
                .bind(bind_date(range.start))
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(TemperatureStats {
            min: row.try_get("min_tobs")?,
            avg: row.try_get("avg_tobs")?,
            max: row.try_get("max_tobs")?,
        })
    }

    async fn ping(&self) -> ClimateResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        CREATE TABLE station (
            id INTEGER PRIMARY KEY,
            station TEXT,
            name TEXT,
            latitude FLOAT,
            longitude FLOAT,
            elevation FLOAT
        );
        CREATE TABLE measurement (
            id INTEGER PRIMARY KEY,
            station TEXT,
            date TEXT,
            prcp FLOAT,
            tobs FLOAT
        );
        INSERT INTO station (station, name, latitude, longitude, elevation) VALUES
            ('USC00519397', 'WAIKIKI 717.2, HI US', 21.2716, -157.8168, 3.0),
            ('USC00519281', 'WAIHEE 837.5, HI US', 21.45167, -157.84889, 32.9);
        INSERT INTO measurement (station, date, prcp, tobs) VALUES
            ('USC00519281', '2016-08-22', 0.40, 76.0),
            ('USC00519281', '2016-08-23', 1.79, 77.0),
            ('USC00519397', '2016-08-23', 0.00, 81.0),
            ('USC00519397', '2017-08-23', NULL, 81),
            ('USC00519281', '2017-08-18', 0.06, 79.0);
    "#;

    async fn seeded_store() -> SqliteClimateStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
        SqliteClimateStore::from_pool(pool)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[tokio::test]
    async fn test_find_observations_since_in_row_order() {
        let store = seeded_store().await;

        let rows = store
            .find_observations_since(&ObservationQuery::since(date("2016-08-23")))
            .await
            .unwrap();

        let dates: Vec<_> = rows.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2016-08-23"),
                date("2016-08-23"),
                date("2017-08-23"),
                date("2017-08-18")
            ]
        );
        assert_eq!(rows[2].precipitation, None);
        assert_eq!(rows[2].temperature, 81.0);
    }

    #[tokio::test]
    async fn test_find_observations_for_station() {
        let store = seeded_store().await;

        let rows = store
            .find_observations_since(
                &ObservationQuery::since(date("2016-08-23")).with_station("USC00519281"),
            )
            .await
            .unwrap();

        let temps: Vec<_> = rows.iter().map(|o| o.temperature).collect();
        assert_eq!(temps, vec![77.0, 79.0]);

        let unknown = store
            .find_observations_since(&ObservationQuery::since(date("2016-08-23")).with_station("NOPE"))
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_stations() {
        let store = seeded_store().await;
        let stations = store.find_all_stations().await.unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].station_id, "USC00519397");
        assert_eq!(stations[1].name, "WAIHEE 837.5, HI US");
        assert_eq!(stations[1].elevation, 32.9);
    }

    #[tokio::test]
    async fn test_aggregate_temperature_closed_and_open() {
        let store = seeded_store().await;

        let closed = store
            .aggregate_temperature(&DateRange::between(date("2016-08-22"), date("2016-08-23")))
            .await
            .unwrap();
        assert_eq!(closed.min, Some(76.0));
        assert_eq!(closed.avg, Some(78.0));
        assert_eq!(closed.max, Some(81.0));

        let open = store
            .aggregate_temperature(&DateRange::from(date("2017-01-01")))
            .await
            .unwrap();
        assert_eq!(open.min, Some(79.0));
        assert_eq!(open.avg, Some(80.0));
        assert_eq!(open.max, Some(81.0));
    }

    #[tokio::test]
    async fn test_aggregate_temperature_no_rows() {
        let store = seeded_store().await;

        let stats = store
            .aggregate_temperature(&DateRange::between(date("2010-01-01"), date("2010-12-31")))
            .await
            .unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_ping_and_closed_pool() {
        let store = seeded_store().await;
        assert!(store.ping().await.is_ok());

        store.close().await;
        let result = store.find_all_stations().await;
        assert!(matches!(result, Err(ClimateError::Storage(_))));
    }

    #[tokio::test]
    async fn test_connect_missing_database() {
        let database = config::DatabaseConfig {
            url: "sqlite:///nonexistent/dir/hawaii.sqlite".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 1,
            query_timeout_seconds: 1,
        };

        let result = SqliteClimateStore::connect(&database).await;
        assert!(matches!(result, Err(ClimateError::Storage(_))));
    }
}
