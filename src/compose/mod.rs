//! Reply composition.
//!
//! Maps an [`IntentRecord`] to reply text. Country questions are answered
//! from the [`StatsProvider`]; topics get canned blocks from [`replies`].
//! Provider failures drop the affected line and never abort the reply.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::chart::ChartRequest;
use crate::intent::{CaseStatus, IntentRecord, Topic};
use crate::stats::StatsProvider;

pub mod replies;

/// Answer to a country statistics question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReply {
    /// One line per (country, status) pair that could be fetched.
    pub text: String,
    /// Chart to render, when one was requested.
    pub chart: Option<ChartRequest>,
}

/// Builds replies for intent records.
#[derive(Clone)]
pub struct ResponseComposer {
    stats: Arc<dyn StatsProvider>,
    log_scale: bool,
}

impl ResponseComposer {
    /// Create a composer fetching through `stats`.
    ///
    /// `log_scale` is copied into every chart request.
    pub fn new(stats: Arc<dyn StatsProvider>, log_scale: bool) -> Self {
        Self { stats, log_scale }
    }

    /// Report the latest counts for every (country, status) pair.
    ///
    /// Lines are ordered by country, then by status. A missing status means
    /// all three. When a plot was asked for, the full history of every pair
    /// is fetched into a [`ChartRequest`].
    pub async fn compose_status_reply(&self, record: &IntentRecord, today: NaiveDate) -> StatusReply {
        let statuses = resolve_statuses(record.status);
        let mut lines = Vec::new();

        for country in &record.countries {
            for status in &statuses {
                match self.stats.latest(country, *status).await {
                    Ok(point) => lines.push(status_line(country, *status, today, point.count)),
                    Err(e) => warn!(
                        country = %country,
                        status = %status,
                        error = %e,
                        "latest count unavailable, skipping line"
                    ),
                }
            }
        }

        let chart = if record.wants_plot && !record.countries.is_empty() {
            Some(self.chart_request(record, &statuses).await)
        } else {
            None
        };

        debug!(lines = lines.len(), chart = chart.is_some(), "status reply composed");

        StatusReply {
            text: lines.join("\n"),
            chart,
        }
    }

    async fn chart_request(&self, record: &IntentRecord, statuses: &[CaseStatus]) -> ChartRequest {
        let mut series = Vec::new();
        for country in &record.countries {
            for status in statuses {
                match self.stats.timeseries(country, *status).await {
                    Ok(s) => series.push(s),
                    Err(e) => warn!(
                        country = %country,
                        status = %status,
                        error = %e,
                        "time series unavailable, leaving it out of the chart"
                    ),
                }
            }
        }

        ChartRequest {
            countries: record.countries.iter().cloned().collect(),
            statuses: statuses.to_vec(),
            series,
            log_scale: self.log_scale,
        }
    }

    /// Fixed help message.
    pub fn compose_default_reply(&self) -> &'static str {
        replies::DEFAULT_HELP
    }
}

/// Canned block for every topic in the record, in reply order.
///
/// Each block is paired with its topic so the sender can pace them.
pub fn compose_topic_reply(record: &IntentRecord) -> Vec<(Topic, &'static str)> {
    record
        .topics
        .iter()
        .map(|topic| (*topic, replies::topic_reply(*topic)))
        .collect()
}

/// Statuses to report: the requested one, or all three.
pub fn resolve_statuses(status: Option<CaseStatus>) -> Vec<CaseStatus> {
    match status {
        Some(status) => vec![status],
        None => CaseStatus::ALL.to_vec(),
    }
}

/// `Total number of <status> cases in <COUNTRY> as of <date> is <count>`.
///
/// Deaths read "Total number of deaths", without "cases".
pub fn status_line(country: &str, status: CaseStatus, today: NaiveDate, count: u64) -> String {
    let phrase = match status {
        CaseStatus::Deaths => status.as_str().to_owned(),
        CaseStatus::Confirmed | CaseStatus::Recovered => format!("{status} cases"),
    };
    format!(
        "Total number of {phrase} in {} as of {today} is {count}",
        country.to_uppercase()
    )
}
