//! covidbot, a chat bot answering COVID-19 case statistics questions.
//!
//! Free-text messages go through a lexical intent extractor (countries,
//! case status, topics), replies are composed from a statistics provider,
//! and comparison charts are rendered on request. Talks to users via Telegram.
//!
//! See `DESIGN.md` for the architecture.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub mod chart;
pub mod compose;
pub mod intent;
pub mod stats;

pub mod gateway;
pub mod telegram;
