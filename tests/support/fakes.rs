//! In-memory fakes for the provider, renderer and transport traits.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use covidbot::gateway::{GatewayError, Messenger, MAX_MESSAGE_CHARS};
use covidbot::intent::{CaseStatus, CountryEntry};
use covidbot::stats::{CountrySeries, DataPoint, StatsError, StatsProvider};

pub fn day(d: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(2020, 4, d) {
        Some(date) => date,
        None => panic!("invalid test day {d}"),
    }
}

/// Stats provider serving fixed series; missing pairs are HTTP 404s.
#[derive(Default)]
pub struct FakeStats {
    pub listing: Option<Vec<CountryEntry>>,
    series: HashMap<(String, CaseStatus), Vec<DataPoint>>,
    calls: Mutex<Vec<(String, CaseStatus)>>,
}

impl FakeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, entries: &[(&str, &str)]) -> Self {
        self.listing = Some(
            entries
                .iter()
                .map(|(name, id)| CountryEntry {
                    display_name: (*name).to_owned(),
                    canonical_id: (*id).to_owned(),
                })
                .collect(),
        );
        self
    }

    /// Three daily points ending at `last`.
    pub fn with_counts(mut self, country: &str, status: CaseStatus, last: u64) -> Self {
        let points = vec![
            DataPoint {
                date: day(1),
                count: last / 4,
            },
            DataPoint {
                date: day(2),
                count: last / 2,
            },
            DataPoint {
                date: day(3),
                count: last,
            },
        ];
        self.series.insert((country.to_owned(), status), points);
        self
    }

    /// Known pair with no data points.
    pub fn with_empty(mut self, country: &str, status: CaseStatus) -> Self {
        self.series.insert((country.to_owned(), status), Vec::new());
        self
    }

    pub fn calls(&self) -> Vec<(String, CaseStatus)> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl StatsProvider for FakeStats {
    async fn countries(&self) -> Result<Vec<CountryEntry>, StatsError> {
        self.listing
            .clone()
            .ok_or_else(|| StatsError::Unavailable("listing disabled".to_owned()))
    }

    async fn timeseries(
        &self,
        country: &str,
        status: CaseStatus,
    ) -> Result<CountrySeries, StatsError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((country.to_owned(), status));
        }
        match self.series.get(&(country.to_owned(), status)) {
            Some(points) => Ok(CountrySeries {
                country: country.to_owned(),
                status,
                points: points.clone(),
            }),
            None => Err(StatsError::HttpStatus {
                status: 404,
                body: "not found".to_owned(),
            }),
        }
    }
}

/// Something the handler sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    File { filename: String, len: usize },
}

/// Messenger recording every send. Optionally fails the first `fail_first` posts.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    fail_first: Mutex<usize>,
    max_chars: Option<usize>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(count: usize) -> Self {
        Self {
            fail_first: Mutex::new(count),
            ..Self::default()
        }
    }

    /// Messenger rejecting posts longer than `max_chars`.
    pub fn with_limit(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(text) => Some(text),
                Sent::File { .. } => None,
            })
            .collect()
    }

    fn should_fail(&self) -> bool {
        match self.fail_first.lock() {
            Ok(mut remaining) if *remaining > 0 => {
                *remaining = remaining.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn record(&self, item: Sent) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(item);
        }
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn post_message(&self, _channel_id: &str, text: &str) -> Result<(), GatewayError> {
        if self.should_fail() {
            return Err(GatewayError::Post("channel unavailable".to_owned()));
        }
        if text.chars().count() > self.max_message_chars() {
            return Err(GatewayError::Post("message is too long".to_owned()));
        }
        self.record(Sent::Text(text.to_owned()));
        Ok(())
    }

    async fn upload_file(
        &self,
        _channel_id: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), GatewayError> {
        self.record(Sent::File {
            filename: filename.to_owned(),
            len: bytes.len(),
        });
        Ok(())
    }

    fn max_message_chars(&self) -> usize {
        self.max_chars.unwrap_or(MAX_MESSAGE_CHARS)
    }
}
