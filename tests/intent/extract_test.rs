//! Intent extraction tests: countries, status, topic flags.

use std::collections::BTreeSet;

use covidbot::intent::{extract, AliasTable, CaseStatus, CountryEntry, Topic, STATIC_ALIASES};

fn table_with(listing: &[(&str, &str)]) -> AliasTable {
    let entries: Vec<CountryEntry> = listing
        .iter()
        .map(|(name, id)| CountryEntry {
            display_name: (*name).to_owned(),
            canonical_id: (*id).to_owned(),
        })
        .collect();
    AliasTable::build(&entries, STATIC_ALIASES)
}

fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn plot_request_for_two_countries() {
    let table = table_with(&[("France", "france"), ("Italy", "italy")]);
    let record = extract("Plot confirmed cases in France and Italy", &table);

    assert!(record.wants_plot);
    assert_eq!(record.status, Some(CaseStatus::Confirmed));
    assert_eq!(record.countries, ids(&["france", "italy"]));
}

#[test]
fn four_word_name_is_found() {
    let table = AliasTable::build(&[], &[("saint vincent and grenadines", "saint-vincent")]);
    let record = extract("deaths in Saint Vincent and Grenadines please", &table);
    assert_eq!(record.countries, ids(&["saint-vincent"]));
}

#[test]
fn overlapping_aliases_deduplicate() {
    let table = AliasTable::static_only();
    let record = extract("I love united states of america and us", &table);
    assert_eq!(record.countries, ids(&["united-states"]));
}

#[test]
fn multi_word_and_single_word_matches_both_surface() {
    let table = table_with(&[("Korea (South)", "korea-south"), ("Guinea", "guinea")]);
    let record = extract("compare south korea, guinea bissau and uk", &table);
    assert_eq!(
        record.countries,
        ids(&["korea-south", "guinea", "guinea-bissau", "united-kingdom"])
    );
}

#[test]
fn partial_names_do_not_match() {
    let table = table_with(&[("France", "france")]);
    let record = extract("francesca lives in frankfurt", &table);
    assert!(record.countries.is_empty());
}

#[test]
fn commas_and_emoji_do_not_block_multi_word_names() {
    let table = AliasTable::static_only();
    let record = extract("numbers for hong kong, \u{1F637}south korea", &table);
    assert_eq!(
        record.countries,
        ids(&["hong-kong-sar-china", "korea-south"])
    );
}

#[test]
fn confirmed_wins_over_deaths() {
    // Documented tie-break: confirmed > recovered > deaths.
    let table = AliasTable::static_only();
    let record = extract("how many confirmed cases and deaths in the uk", &table);
    assert_eq!(record.status, Some(CaseStatus::Confirmed));
}

#[test]
fn recovered_wins_over_deaths() {
    let table = AliasTable::static_only();
    let record = extract("how many people recovered and how many died", &table);
    assert_eq!(record.status, Some(CaseStatus::Recovered));
}

#[test]
fn death_keywords_map_to_deaths() {
    let table = AliasTable::static_only();
    for text in ["number of deaths", "how many died", "death toll"] {
        assert_eq!(
            extract(text, &table).status,
            Some(CaseStatus::Deaths),
            "text {text:?}"
        );
    }
}

#[test]
fn thanks_and_bye_are_both_set() {
    let table = AliasTable::static_only();
    let record = extract("thanks, bye", &table);
    assert!(record.has_topic(Topic::Thanks));
    assert!(record.has_topic(Topic::Farewell));
    assert_eq!(record.topics.len(), 2);
}

#[test]
fn topic_keywords_are_detected() {
    let table = AliasTable::static_only();
    let cases = [
        ("what are the symptoms of covid", Topic::Symptoms),
        ("how does the virus spread", Topic::Spread),
        ("is there a vaccine yet", Topic::Vaccine),
        ("any drugs or a cure", Topic::Vaccine),
        ("how do i prevent infection", Topic::Prevention),
        ("how can we stop it", Topic::Prevention),
        ("thank you so much", Topic::Thanks),
        ("tell me about yourself", Topic::SelfIntro),
        ("what do you do", Topic::SelfIntro),
        ("goodbye", Topic::Farewell),
    ];
    for (text, topic) in cases {
        assert!(extract(text, &table).has_topic(topic), "{text:?} -> {topic:?}");
    }
}

#[test]
fn small_talk_flags() {
    let table = AliasTable::static_only();
    let hello = extract("Hello bot", &table);
    assert!(hello.greeting);
    assert!(!hello.needs_default_reply());

    let how = extract("how are you doing", &table);
    assert!(how.wellbeing);
    assert!(!how.has_topic(Topic::SelfIntro));
}

#[test]
fn unknown_text_yields_empty_record() {
    let table = AliasTable::static_only();
    let record = extract("asdf qwerty", &table);
    assert!(record.countries.is_empty());
    assert!(record.status.is_none());
    assert!(!record.wants_plot);
    assert!(record.topics.is_empty());
    assert!(record.needs_default_reply());
}

#[test]
fn blank_text_yields_empty_record() {
    let table = AliasTable::static_only();
    for text in ["", "   ", "\n\t"] {
        assert!(extract(text, &table).needs_default_reply(), "text {text:?}");
    }
}

#[test]
fn extraction_is_idempotent() {
    let table = table_with(&[("Spain", "spain")]);
    let text = "Plot deaths in Spain and the USA, thanks!";
    assert_eq!(extract(text, &table), extract(text, &table));
}
