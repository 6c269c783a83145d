//! Case-insensitive country alias table.
//!
//! Maps the many ways people write a country ("us", "USA", "United States")
//! to the provider's canonical slug ("united-states"). Built once at startup
//! and shared read-only afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::stats::StatsProvider;

/// One country as listed by the statistics provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    /// Official display name, e.g. "Viet Nam".
    pub display_name: String,
    /// Canonical identifier understood by the provider, e.g. "vietnam".
    pub canonical_id: String,
}

/// Hand-curated aliases applied on top of the provider listing.
///
/// Covers abbreviations, colloquial names and official names whose
/// punctuation the message scanner cannot reproduce.
pub const STATIC_ALIASES: &[(&str, &str)] = &[
    ("congo b", "congo-brazzaville"),
    ("congo brazzaville", "congo-brazzaville"),
    ("palestine", "palestine"),
    ("palestinian", "palestine"),
    ("sao tome", "sao-tome-and-principe"),
    ("british indian ocean", "british-indian-ocean-territory"),
    ("uae", "united-arab-emirates"),
    ("falkland islands malvinas", "falkland-islands-malvinas"),
    ("holy see vatican city state", "holy-see-vatican-city-state"),
    ("vatican city", "holy-see-vatican-city-state"),
    ("vatican", "holy-see-vatican-city-state"),
    ("cote divoire", "cote-divoire"),
    ("iran", "iran"),
    ("macedonia", "macedonia"),
    ("cocos keeling islands", "cocos-keeling-islands"),
    ("uk", "united-kingdom"),
    ("congo kinshasa", "congo-kinshasa"),
    ("congo k", "congo-kinshasa"),
    ("united states", "united-states"),
    ("us", "united-states"),
    ("usa", "united-states"),
    ("guinea bissau", "guinea-bissau"),
    ("syria", "syria"),
    ("venezuela", "venezuela"),
    ("timor leste", "timor-leste"),
    ("south korea", "korea-south"),
    ("vietnam", "vietnam"),
    ("us virgin islands", "virgin-islands"),
    ("macao", "macao-sar-china"),
    ("hong kong", "hong-kong-sar-china"),
    ("hk", "hong-kong-sar-china"),
    ("saint-barthelemy", "saint-barthélemy"),
    ("barthelemy", "saint-barthélemy"),
    ("micronesia", "micronesia"),
];

/// Country alias → canonical id, keyed by lowercased alias.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    canonical_of: HashMap<String, String>,
}

impl AliasTable {
    /// Build a table from a provider listing and an ordered overlay.
    ///
    /// Provider entries are registered first; overlay entries follow in
    /// order, so a later entry replaces an earlier one with the same alias.
    pub fn build<'a>(
        listing: impl IntoIterator<Item = &'a CountryEntry>,
        overlay: &[(&str, &str)],
    ) -> Self {
        let mut table = Self::default();
        for entry in listing {
            table.insert(&entry.display_name, &entry.canonical_id);
        }
        for (alias, canonical_id) in overlay {
            table.insert(alias, canonical_id);
        }
        table
    }

    /// Table holding only [`STATIC_ALIASES`].
    pub fn static_only() -> Self {
        Self::build(&[], STATIC_ALIASES)
    }

    /// Fetch the provider listing and build the table with [`STATIC_ALIASES`].
    ///
    /// A provider failure is logged and the static overlay is used alone.
    pub async fn load(provider: &dyn StatsProvider) -> Self {
        match provider.countries().await {
            Ok(listing) => {
                let table = Self::build(&listing, STATIC_ALIASES);
                info!(
                    provider_countries = listing.len(),
                    aliases = table.len(),
                    "alias table built"
                );
                table
            }
            Err(e) => {
                warn!(error = %e, "country listing unavailable, using static aliases only");
                Self::static_only()
            }
        }
    }

    fn insert(&mut self, alias: &str, canonical_id: &str) {
        self.canonical_of
            .insert(alias.to_lowercase(), canonical_id.to_owned());
    }

    /// Resolve an alias to its canonical id, ignoring case.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.canonical_of
            .get(&text.to_lowercase())
            .map(String::as_str)
    }

    /// Whether `text` is a registered alias, ignoring case.
    pub fn contains(&self, text: &str) -> bool {
        self.lookup(text).is_some()
    }

    /// Iterate over `(alias, canonical_id)` pairs. Aliases are lowercased.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.canonical_of
            .iter()
            .map(|(alias, id)| (alias.as_str(), id.as_str()))
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.canonical_of.len()
    }

    /// Whether the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.canonical_of.is_empty()
    }
}
