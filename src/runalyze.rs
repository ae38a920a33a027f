use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Seconds from midnight to 23:59:59 of the same day.
const END_OF_DAY_SECONDS: i64 = 86_399;

/// Configuration for the Runalyze history client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the internal data API
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: "https://runalyze.com/_internal/data".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// The per-athlete document pair produced by one fetch cycle.
///
/// Each document is independently absent when its fetch failed; a failure
/// never cancels the sibling fetch.
#[derive(Debug, Clone, Default)]
pub struct AthleteDocuments {
    /// Marathon-shape history (readiness fractions per day)
    pub marathon_shape: Option<Value>,
    /// VO2max history (readings per day)
    pub vo2max: Option<Value>,
}

/// Runalyze history document client.
///
/// Fetches the two internal history endpoints (marathon-shape and vo2max)
/// as raw JSON values for the normalization pipeline.
#[derive(Debug)]
pub struct HistoryClient {
    client: Client,
    config: FetchConfig,
}

impl HistoryClient {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    /// Returns `FetchError::ClientCreation` if HTTP client construction fails.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// # Errors
    /// Returns `FetchError::ClientCreation` if HTTP client construction fails.
    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientCreation(e.to_string()))?;

        Ok(HistoryClient { client, config })
    }

    /// Builds the marathon-shape history URL for a date range (inclusive).
    ///
    /// The endpoint takes `YYYY-MM-DD` path segments.
    pub fn marathon_shape_url(&self, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/athlete/history/marathon-shape/{}/{}",
            self.config.base_url, from, to
        )
    }

    /// Builds the vo2max history URL for a date range (inclusive).
    ///
    /// The endpoint takes epoch-second path segments: start of the from-day
    /// and end (23:59:59) of the to-day.
    pub fn vo2max_url(&self, from: NaiveDate, to: NaiveDate) -> String {
        let from_ts = crate::time_series::day_start_utc(from).timestamp();
        let to_ts = crate::time_series::day_start_utc(to).timestamp() + END_OF_DAY_SECONDS;
        format!(
            "{}/athlete/history/vo2max/{}/{}",
            self.config.base_url, from_ts, to_ts
        )
    }

    /// Fetches one history document as raw JSON.
    ///
    /// # Errors
    /// Returns `FetchError::Network` on transport failure, `FetchError::Api`
    /// on a non-success status, and `FetchError::Parse` when the body is not
    /// valid JSON.
    pub async fn fetch_document(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Fetches both per-athlete documents for a date range in parallel.
    ///
    /// Failures are isolated per document: a failed fetch is logged and
    /// degraded to `None`, and the projection pipeline degrades in turn to
    /// empty-series outputs.
    pub async fn fetch_athlete_history(&self, from: NaiveDate, to: NaiveDate) -> AthleteDocuments {
        let marathon_url = self.marathon_shape_url(from, to);
        let vo2_url = self.vo2max_url(from, to);

        let (marathon_shape, vo2max) = futures::join!(
            self.fetch_or_absent(&marathon_url, "marathon-shape"),
            self.fetch_or_absent(&vo2_url, "vo2max"),
        );

        AthleteDocuments {
            marathon_shape,
            vo2max,
        }
    }

    async fn fetch_or_absent(&self, url: &str, label: &str) -> Option<Value> {
        match self.fetch_document(url).await {
            Ok(document) => Some(document),
            Err(err) => {
                tracing::warn!("{} document degraded to absent: {}", label, err);
                None
            }
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Errors that can occur while fetching history documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// HTTP client creation failed
    ClientCreation(String),
    /// Network error occurred
    Network(String),
    /// API returned an error response
    Api(String),
    /// Response body was not valid JSON
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::ClientCreation(msg) => write!(f, "Client creation error: {}", msg),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Api(msg) => write!(f, "API error: {}", msg),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
