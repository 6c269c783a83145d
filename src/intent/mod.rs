//! Lexical intent extraction for inbound chat messages.
//!
//! Turns free text into an [`IntentRecord`]: the countries mentioned (resolved
//! through the [`AliasTable`]), the case status asked about, and a set of
//! independent topic flags. Everything is fixed pattern matching, so the same
//! text always yields the same record.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod aliases;
pub mod countries;
pub mod patterns;

pub use aliases::{AliasTable, CountryEntry, STATIC_ALIASES};

use patterns::Cue;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Case category reported by the statistics provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Confirmed infections.
    Confirmed,
    /// Recovered patients.
    Recovered,
    /// Deaths.
    Deaths,
}

impl CaseStatus {
    /// Every status, in reporting order.
    pub const ALL: [CaseStatus; 3] = [Self::Confirmed, Self::Recovered, Self::Deaths];

    /// Identifier used by the provider API and in chart labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Recovered => "recovered",
            Self::Deaths => "deaths",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation topic with a canned answer.
///
/// Declaration order is reply order: `Ord` on this enum drives the order in
/// which topic blocks are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// How the disease presents.
    Symptoms,
    /// How the virus spreads.
    Spread,
    /// Vaccines, drugs, treatment, cure.
    Vaccine,
    /// Prevention advice.
    Prevention,
    /// The user says thanks.
    Thanks,
    /// The user asks the bot about itself.
    SelfIntro,
    /// The user says goodbye.
    Farewell,
}

/// Structured result of reading one message.
///
/// Fields are derived independently from the same text; any combination
/// may be set at once and the reply layer decides what to send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntentRecord {
    /// Canonical country ids, deduplicated and sorted.
    pub countries: BTreeSet<String>,
    /// Requested case status; `None` means all of them.
    pub status: Option<CaseStatus>,
    /// The user asked for a chart.
    pub wants_plot: bool,
    /// Topics mentioned, iterated in reply order.
    pub topics: BTreeSet<Topic>,
    /// "hi" / "hello".
    pub greeting: bool,
    /// "how are you" style small talk.
    pub wellbeing: bool,
}

impl IntentRecord {
    /// Whether a topic flag is set.
    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// No country, status, plot request or topic was found.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
            && self.status.is_none()
            && !self.wants_plot
            && self.topics.is_empty()
    }

    /// Nothing at all was recognised, greetings included.
    pub fn needs_default_reply(&self) -> bool {
        self.is_empty() && !self.greeting && !self.wellbeing
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Read a message and produce its [`IntentRecord`].
///
/// Never fails: text without any recognised pattern yields an empty record.
pub fn extract(text: &str, aliases: &AliasTable) -> IntentRecord {
    let lower = text.to_lowercase();

    IntentRecord {
        countries: countries::scan(&lower, aliases),
        status: patterns::classify_status(&lower),
        wants_plot: patterns::has_cue(&lower, Cue::Plot),
        topics: patterns::detect_topics(&lower),
        greeting: patterns::has_cue(&lower, Cue::Greeting),
        wellbeing: patterns::has_cue(&lower, Cue::Wellbeing),
    }
}

/// Intent extractor bound to a shared, immutable alias table.
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    aliases: Arc<AliasTable>,
}

impl IntentExtractor {
    /// Create an extractor over the given alias table.
    pub fn new(aliases: Arc<AliasTable>) -> Self {
        Self { aliases }
    }

    /// Extract the intent of a message. See [`extract`].
    pub fn extract(&self, text: &str) -> IntentRecord {
        extract(text, &self.aliases)
    }
}
