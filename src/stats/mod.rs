//! Statistics provider abstraction.
//!
//! Defines the [`StatsProvider`] trait the reply layer fetches case data
//! through, the shared data types, and the HTTP helpers used by the
//! [`covid19api::Covid19ApiClient`] implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intent::{CaseStatus, CountryEntry};

pub mod covid19api;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Cumulative case count on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Day the count was recorded.
    pub date: NaiveDate,
    /// Cumulative number of cases up to and including `date`.
    pub count: u64,
}

/// Daily cumulative counts for one country and status, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySeries {
    /// Canonical country id.
    pub country: String,
    /// Case status the counts refer to.
    pub status: CaseStatus,
    /// Points ordered by ascending date.
    pub points: Vec<DataPoint>,
}

impl CountrySeries {
    /// Most recent point, if any.
    pub fn latest(&self) -> Option<DataPoint> {
        self.points.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by statistics providers.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// HTTP transport failure.
    #[error("stats request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("stats response parse error: {0}")]
    Parse(String),
    /// Provider responded with an error status.
    #[error("stats provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, whitespace-collapsed and truncated.
        body: String,
    },
    /// Provider has no data points for the request.
    #[error("no data for {country} ({status})")]
    EmptySeries {
        /// Canonical country id.
        country: String,
        /// Requested status.
        status: CaseStatus,
    },
    /// Provider is disabled in this run.
    #[error("stats provider unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Source of country listings and case counts.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// message handler.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// All countries the provider knows about.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] on transport, status or parse failure.
    async fn countries(&self) -> Result<Vec<CountryEntry>, StatsError>;

    /// Full daily history for one country and status.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] on transport, status or parse failure.
    async fn timeseries(
        &self,
        country: &str,
        status: CaseStatus,
    ) -> Result<CountrySeries, StatsError>;

    /// Latest cumulative count for one country and status.
    ///
    /// Defaults to the last point of [`StatsProvider::timeseries`].
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySeries`] when the history is empty.
    async fn latest(&self, country: &str, status: CaseStatus) -> Result<DataPoint, StatsError> {
        let series = self.timeseries(country, status).await?;
        series.latest().ok_or_else(|| StatsError::EmptySeries {
            country: country.to_owned(),
            status,
        })
    }
}

/// Provider that never has data. Used for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl StatsProvider for OfflineProvider {
    async fn countries(&self) -> Result<Vec<CountryEntry>, StatsError> {
        Err(StatsError::Unavailable("offline mode".to_owned()))
    }

    async fn timeseries(
        &self,
        _country: &str,
        _status: CaseStatus,
    ) -> Result<CountrySeries, StatsError> {
        Err(StatsError::Unavailable("offline mode".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `StatsError::Request` on transport failure, `StatsError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, StatsError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StatsError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = collapsed
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    collapsed
}
