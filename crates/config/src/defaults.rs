use chrono::NaiveDate;

pub fn default_service_name() -> String {
    "climate-api".to_string()
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    5000
}

pub fn default_request_timeout() -> u64 {
    30
}

pub fn default_database_url() -> String {
    "sqlite://hawaii.sqlite".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_acquire_timeout() -> u64 {
    5
}

pub fn default_query_timeout() -> u64 {
    10
}

/// Last date present in the Hawaii dataset.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 8, 23).unwrap_or_default()
}

pub fn default_window_days() -> u32 {
    365
}

/// Station with the most observations in the Hawaii dataset.
pub fn default_primary_station() -> String {
    "USC00519281".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
