//! covid19api.com client.
//!
//! Endpoints used:
//! - `GET /countries` → `[{"Country", "Slug", "ISO2"}]`
//! - `GET /total/country/{slug}/status/{status}` → `[{"Cases", "Date", ...}]`

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::{check_http_response, CountrySeries, DataPoint, StatsError, StatsProvider};
use crate::intent::{CaseStatus, CountryEntry};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.covid19api.com";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Entry of the `/countries` listing.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ApiCountry {
    /// Display name.
    #[serde(rename = "Country")]
    pub country: String,
    /// URL slug used by the other endpoints.
    #[serde(rename = "Slug")]
    pub slug: String,
}

/// One day of a `/total/country` history.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ApiDay {
    /// Cumulative cases.
    #[serde(rename = "Cases")]
    pub cases: u64,
    /// RFC 3339 timestamp, e.g. `2020-03-01T00:00:00Z`.
    #[serde(rename = "Date")]
    pub date: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the covid19api.com REST API.
#[derive(Debug, Clone)]
pub struct Covid19ApiClient {
    /// Base URL without trailing slash.
    #[doc(hidden)]
    pub base_url: String,
    client: reqwest::Client,
}

impl Covid19ApiClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    async fn get(&self, url: &str) -> Result<String, StatsError> {
        debug!(url, "stats request");
        let response = self.client.get(url).send().await?;
        check_http_response(response).await
    }
}

#[async_trait]
impl StatsProvider for Covid19ApiClient {
    async fn countries(&self) -> Result<Vec<CountryEntry>, StatsError> {
        let body = self.get(&format!("{}/countries", self.base_url)).await?;
        parse_countries(&body)
    }

    async fn timeseries(
        &self,
        country: &str,
        status: CaseStatus,
    ) -> Result<CountrySeries, StatsError> {
        let url = series_url(&self.base_url, country, status);
        let body = self.get(&url).await?;
        parse_series(country, status, &body)
    }
}

// ---------------------------------------------------------------------------
// Request / Response helpers (pub for integration testing)
// ---------------------------------------------------------------------------

/// URL of the cumulative history endpoint.
#[doc(hidden)]
pub fn series_url(base_url: &str, country: &str, status: CaseStatus) -> String {
    format!("{base_url}/total/country/{country}/status/{status}")
}

/// Parse the `/countries` listing.
///
/// # Errors
///
/// Returns `StatsError::Parse` if the body is not the expected JSON array.
#[doc(hidden)]
pub fn parse_countries(body: &str) -> Result<Vec<CountryEntry>, StatsError> {
    let countries: Vec<ApiCountry> =
        serde_json::from_str(body).map_err(|e| StatsError::Parse(e.to_string()))?;
    Ok(countries
        .into_iter()
        .map(|c| CountryEntry {
            display_name: c.country,
            canonical_id: c.slug,
        })
        .collect())
}

/// Parse a `/total/country` history into a series sorted by date.
///
/// # Errors
///
/// Returns `StatsError::Parse` if the body or any date is malformed.
#[doc(hidden)]
pub fn parse_series(
    country: &str,
    status: CaseStatus,
    body: &str,
) -> Result<CountrySeries, StatsError> {
    let days: Vec<ApiDay> =
        serde_json::from_str(body).map_err(|e| StatsError::Parse(e.to_string()))?;

    let mut points = days
        .iter()
        .map(|day| {
            Ok(DataPoint {
                date: parse_day(&day.date)?,
                count: day.cases,
            })
        })
        .collect::<Result<Vec<_>, StatsError>>()?;
    points.sort_by_key(|p| p.date);

    Ok(CountrySeries {
        country: country.to_owned(),
        status,
        points,
    })
}

fn parse_day(raw: &str) -> Result<NaiveDate, StatsError> {
    let day = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| StatsError::Parse(format!("invalid date {raw:?}: {e}")))
}
