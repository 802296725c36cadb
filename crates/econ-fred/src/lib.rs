#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/econ/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Federal Reserve Economic Data (FRED) provider.
//!
//! This crate implements the econ-core traits for the
//! [FRED](https://fred.stlouisfed.org/docs/api/fred/) observations API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use econ_fred::FredProvider;
//! use econ_core::{SeriesProvider, SeriesId};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FredProvider::from_env()?;
//!
//!     let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//!     let series = provider.fetch_series(&SeriesId::new("DFF"), Some(start)).await?;
//!     println!("{} observations", series.len());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use econ_core::{
    DataProvider, EconError, Observation, Result, Series, SeriesId, SeriesProvider,
};
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Base URL for the FRED API.
const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "FRED_API_KEY";

/// Value FRED reports for dates without data.
const MISSING_VALUE: &str = ".";

/// Per-request timeout for the default client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// FRED series provider.
///
/// One [`fetch_series`](SeriesProvider::fetch_series) call is one HTTP request
/// to the `series/observations` endpoint.
#[derive(Clone)]
pub struct FredProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for FredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FredProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FredProvider {
    /// Create a new FRED provider with the given API key.
    ///
    /// # Errors
    /// Returns [`EconError::ProviderNotConfigured`] if the HTTP client cannot be
    /// built (for example when no TLS backend can be initialized).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                EconError::ProviderNotConfigured(format!("cannot build HTTP client: {e}"))
            })?;
        Ok(Self::with_client(client, api_key))
    }

    /// Create a new FRED provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FRED_BASE_URL.to_string(),
        }
    }

    /// Create a provider with the key from the `FRED_API_KEY` environment variable.
    ///
    /// # Errors
    /// Returns [`EconError::ProviderNotConfigured`] if the variable is unset or
    /// empty, or the HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Self::new(key.trim()),
            _ => Err(EconError::ProviderNotConfigured(format!(
                "FRED requires an API key in {API_KEY_ENV}"
            ))),
        }
    }

    /// Point the provider at a different API root (mirrors, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the observations request for a series. Query values are percent-encoded.
    fn observations_request(&self, id: &SeriesId, start: Option<NaiveDate>) -> Result<Request> {
        let mut query: Vec<(&str, String)> = vec![
            ("series_id", id.as_str().to_string()),
            ("api_key", self.api_key.clone()),
            ("file_type", "json".to_string()),
        ];
        if let Some(start) = start {
            query.push(("observation_start", start.format("%Y-%m-%d").to_string()));
        }

        self.client
            .get(format!("{}/series/observations", self.base_url))
            .query(&query)
            .build()
            .map_err(|e| EconError::InvalidParameter(e.without_url().to_string()))
    }

    /// Send a request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, id: &SeriesId, request: Request) -> Result<T> {
        debug!(series = %id, "FRED request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| EconError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EconError::RateLimited {
                provider: "FRED".to_string(),
                retry_after: None,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| EconError::Network(e.without_url().to_string()))?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            let message = serde_json::from_str::<FredError>(&text)
                .map(|e| e.error_message)
                .unwrap_or(text);
            return Err(EconError::SeriesNotFound(format!("{id}: {message}")));
        }

        if !status.is_success() {
            return Err(EconError::Network(format!("HTTP {status} for {id}")));
        }

        serde_json::from_str(&text).map_err(|e| EconError::Parse(format!("{id}: {e}")))
    }
}

/// Convert an observations payload into a series, skipping missing values.
fn parse_observations(
    id: &SeriesId,
    start: Option<NaiveDate>,
    response: ObservationsResponse,
) -> Result<Series> {
    let observations: Vec<Observation> = response
        .observations
        .into_iter()
        .filter_map(|raw| {
            if raw.value == MISSING_VALUE {
                return None;
            }
            let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").ok()?;
            match raw.value.parse::<f64>() {
                Ok(value) => Some(Observation::new(date, value)),
                Err(_) => {
                    trace!(series = %id, date = %raw.date, value = %raw.value, "Skipping non-numeric value");
                    None
                }
            }
        })
        .collect();

    if observations.is_empty() {
        return Err(EconError::DataNotAvailable {
            series: id.to_string(),
            start: start.map_or_else(|| "all".to_string(), |d| d.to_string()),
        });
    }

    Ok(Series::new(id.clone(), observations))
}

impl DataProvider for FredProvider {
    fn name(&self) -> &str {
        "FRED"
    }

    fn description(&self) -> &str {
        "Federal Reserve Economic Data - St. Louis Fed time series API"
    }
}

#[async_trait]
impl SeriesProvider for FredProvider {
    async fn fetch_series(&self, id: &SeriesId, start: Option<NaiveDate>) -> Result<Series> {
        let request = self.observations_request(id, start)?;
        let response: ObservationsResponse = self.get(id, request).await?;
        let series = parse_observations(id, start, response)?;
        debug!(series = %id, observations = series.len(), "FRED series fetched");
        Ok(series)
    }
}

/// FRED observations response.
#[derive(Debug, Clone, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

/// One observation as FRED reports it; values are strings.
#[derive(Debug, Clone, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// FRED error body.
#[derive(Debug, Clone, Deserialize)]
struct FredError {
    error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(request: &Request) -> Vec<(String, String)> {
        request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_request_building() {
        let provider = FredProvider::new("test_key").unwrap();
        let id = SeriesId::new("dff");
        let request = provider.observations_request(&id, None).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.stlouisfed.org/fred/series/observations?series_id=DFF&api_key=test_key&file_type=json"
        );

        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let request = provider.observations_request(&id, Some(start)).unwrap();
        assert!(
            query_of(&request).contains(&("observation_start".to_string(), "2020-01-01".to_string()))
        );
    }

    #[test]
    fn test_query_values_are_encoded() {
        let provider = FredProvider::new("key&file_type=xml").unwrap();
        let request = provider
            .observations_request(&SeriesId::new("DGS10 X"), None)
            .unwrap();

        let url = request.url().as_str();
        assert!(url.contains("api_key=key%26file_type%3Dxml"));
        assert!(!url.contains("DGS10 X"));

        let query = query_of(&request);
        assert_eq!(query.len(), 3);
        assert!(query.contains(&("api_key".to_string(), "key&file_type=xml".to_string())));
        assert!(query.contains(&("series_id".to_string(), "DGS10 X".to_string())));
        assert!(query.contains(&("file_type".to_string(), "json".to_string())));
    }

    #[test]
    fn test_base_url_override() {
        let provider = FredProvider::new("k")
            .unwrap()
            .with_base_url("http://localhost:8080/fred/");
        let request = provider
            .observations_request(&SeriesId::new("DFF"), None)
            .unwrap();
        assert!(
            request
                .url()
                .as_str()
                .starts_with("http://localhost:8080/fred/series/observations?")
        );
    }

    #[test]
    fn test_bad_base_url_is_invalid_parameter() {
        let provider = FredProvider::new("k").unwrap().with_base_url("not a url");
        let result = provider.observations_request(&SeriesId::new("DFF"), None);
        assert!(matches!(result, Err(EconError::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_skips_missing_values() {
        let body = r#"{
            "realtime_start": "2024-01-05",
            "observations": [
                {"realtime_start": "2024-01-05", "date": "2024-01-01", "value": "."},
                {"realtime_start": "2024-01-05", "date": "2024-01-02", "value": "5.33"},
                {"realtime_start": "2024-01-05", "date": "2024-01-03", "value": "5.32"}
            ]
        }"#;
        let response: ObservationsResponse = serde_json::from_str(body).unwrap();
        let series = parse_observations(&SeriesId::new("DFF"), None, response).unwrap();

        assert_eq!(series.len(), 2);
        let first = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(series.value_at(first), Some(5.33));
    }

    #[test]
    fn test_parse_empty_is_not_available() {
        let response: ObservationsResponse =
            serde_json::from_str(r#"{"observations": []}"#).unwrap();
        let result = parse_observations(&SeriesId::new("DFF"), None, response);
        assert!(matches!(result, Err(EconError::DataNotAvailable { .. })));
    }

    #[test]
    fn test_provider_metadata() {
        let provider = FredProvider::new("test_key").unwrap();
        assert_eq!(provider.name(), "FRED");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = FredProvider::new("secret_key_12345").unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
