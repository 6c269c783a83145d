//! Regex tables for status, topic and small-talk detection.
//!
//! Each table is a list of `(label, pattern)` pairs compiled once. Topic and
//! cue patterns are tested independently of each other; status patterns are
//! tested in table order and the first hit wins.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::{CaseStatus, Topic};

/// Non-topic lexical cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A chart was requested.
    Plot,
    /// "hi" / "hello".
    Greeting,
    /// "how are you doing" / "how is it going".
    Wellbeing,
}

/// Status patterns in priority order: confirmed beats recovered beats deaths.
const STATUS_PATTERNS: &[(CaseStatus, &str)] = &[
    (CaseStatus::Confirmed, r"(confirm|confrim|verify|verifi)(s|ed)?"),
    (CaseStatus::Recovered, r"(recover)(s|ed)?"),
    (CaseStatus::Deaths, r"(die|died|death|deaths)"),
];

const TOPIC_PATTERNS: &[(Topic, &str)] = &[
    (Topic::SelfIntro, r"(\byourself\b|\byou\b\s\bdo\b)"),
    (Topic::Farewell, r"(\bbye\b|\bgoodbye\b)"),
    (Topic::Symptoms, r"symptoms?[\s\S]*(virus|coronavirus|covid)?"),
    (Topic::Spread, r"(virus|covid)?[\s\S]*spreads?"),
    (Topic::Vaccine, r"(vaccin|drugs?|treatment|cure)"),
    (Topic::Prevention, r"(prevent|stop)[\s\S]*"),
    (Topic::Thanks, r"(thanks|thank\syou)"),
];

const CUE_PATTERNS: &[(Cue, &str)] = &[
    (Cue::Plot, r"(plot|figure|chart|image)"),
    (Cue::Greeting, r"(\bhi\b|\bhello\b)"),
    (Cue::Wellbeing, r"(are\syou(\sdo)?|is\sit\sgo)"),
];

static STATUS_TABLE: LazyLock<Vec<(CaseStatus, Regex)>> =
    LazyLock::new(|| compile(STATUS_PATTERNS));
static TOPIC_TABLE: LazyLock<Vec<(Topic, Regex)>> = LazyLock::new(|| compile(TOPIC_PATTERNS));
static CUE_TABLE: LazyLock<Vec<(Cue, Regex)>> = LazyLock::new(|| compile(CUE_PATTERNS));

fn compile<K: Copy>(specs: &[(K, &str)]) -> Vec<(K, Regex)> {
    specs
        .iter()
        .filter_map(|(label, pattern)| match Regex::new(pattern) {
            Ok(regex) => Some((*label, regex)),
            Err(e) => {
                warn!(pattern, error = %e, "skipping invalid intent pattern");
                None
            }
        })
        .collect()
}

/// First status whose pattern occurs in the text.
pub fn classify_status(lower: &str) -> Option<CaseStatus> {
    STATUS_TABLE
        .iter()
        .find(|(_, regex)| regex.is_match(lower))
        .map(|(status, _)| *status)
}

/// Every topic whose pattern occurs in the text.
pub fn detect_topics(lower: &str) -> BTreeSet<Topic> {
    TOPIC_TABLE
        .iter()
        .filter(|(_, regex)| regex.is_match(lower))
        .map(|(topic, _)| *topic)
        .collect()
}

/// Whether the given cue occurs in the text.
pub fn has_cue(lower: &str, cue: Cue) -> bool {
    CUE_TABLE
        .iter()
        .any(|(label, regex)| *label == cue && regex.is_match(lower))
}
