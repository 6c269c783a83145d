//! End-to-end message handling against fake providers and transports.

use std::sync::Arc;
use std::time::Duration;

use covidbot::chart::SvgRenderer;
use covidbot::compose::replies;
use covidbot::gateway::{
    ignore_reason, BotContext, BotIdentity, IgnoreReason, InboundEvent, MessageHandler,
};
use covidbot::intent::{AliasTable, CaseStatus, Topic};

use crate::fakes::{day, FakeStats, RecordingMessenger, Sent};

fn handler_with(stats: FakeStats, pause: Duration) -> MessageHandler {
    handler_named("@CovidBot", stats, pause)
}

fn handler_named(mention: &str, stats: FakeStats, pause: Duration) -> MessageHandler {
    MessageHandler::new(BotContext {
        aliases: Arc::new(AliasTable::build(
            &[
                covidbot::intent::CountryEntry {
                    display_name: "France".to_owned(),
                    canonical_id: "france".to_owned(),
                },
                covidbot::intent::CountryEntry {
                    display_name: "Italy".to_owned(),
                    canonical_id: "italy".to_owned(),
                },
            ],
            covidbot::intent::STATIC_ALIASES,
        )),
        stats: Arc::new(stats),
        renderer: Arc::new(SvgRenderer::default()),
        identity: BotIdentity::new(mention),
        pause,
        log_scale: false,
    })
}

fn handler() -> MessageHandler {
    handler_with(FakeStats::new(), Duration::ZERO)
}

fn group(text: &str) -> InboundEvent {
    InboundEvent {
        text: text.to_owned(),
        channel_id: "group-1".to_owned(),
        sender_id: "42".to_owned(),
        sender_name: "@alice".to_owned(),
        is_bot_message: false,
        is_direct: false,
    }
}

fn direct(text: &str) -> InboundEvent {
    InboundEvent {
        is_direct: true,
        ..group(text)
    }
}

#[tokio::test]
async fn bot_messages_are_ignored() {
    let messenger = RecordingMessenger::new();
    let event = InboundEvent {
        is_bot_message: true,
        ..direct("@covidbot hello")
    };
    assert!(!handler().handle_at(&event, &messenger, day(3)).await);
    assert!(messenger.sent().is_empty());
}

#[tokio::test]
async fn group_messages_need_a_mention() {
    let messenger = RecordingMessenger::new();
    let handler = handler();

    assert!(!handler.handle_at(&group("hello everyone"), &messenger, day(3)).await);
    assert!(messenger.sent().is_empty());

    assert!(handler.handle_at(&group("@COVIDBOT hello"), &messenger, day(3)).await);
    assert_eq!(messenger.texts(), vec!["Hello @alice!".to_owned()]);
}

#[test]
fn direct_messages_need_no_mention() {
    let identity = BotIdentity::new("@covidbot");
    assert_eq!(ignore_reason(&direct("hi"), &identity), None);
    assert_eq!(
        ignore_reason(&group("hi"), &identity),
        Some(IgnoreReason::NotAddressed)
    );
    assert_eq!(ignore_reason(&group("hi @covidbot"), &identity), None);
    let from_bot = InboundEvent {
        is_bot_message: true,
        ..group("hi @covidbot")
    };
    assert_eq!(
        ignore_reason(&from_bot, &identity),
        Some(IgnoreReason::BotMessage)
    );
}

#[tokio::test]
async fn longer_handle_is_not_a_mention() {
    let messenger = RecordingMessenger::new();
    let handled = handler()
        .handle_at(&group("@covidbot_fan what are the symptoms"), &messenger, day(3))
        .await;
    assert!(!handled);
    assert!(messenger.sent().is_empty());
}

#[tokio::test]
async fn keywords_in_bot_username_are_not_intents() {
    let stats = FakeStats::new().with_counts("italy", CaseStatus::Deaths, 300);
    let messenger = RecordingMessenger::new();
    handler_named("@covid_chart_bot", stats, Duration::ZERO)
        .handle_at(&group("@Covid_Chart_Bot deaths in italy"), &messenger, day(3))
        .await;

    assert_eq!(
        messenger.sent(),
        vec![
            Sent::Text(replies::FETCHING.to_owned()),
            Sent::Text("Total number of deaths in ITALY as of 2020-04-03 is 300".to_owned()),
        ]
    );
}

#[tokio::test]
async fn long_status_reply_is_split_between_lines() {
    let stats = FakeStats::new()
        .with_counts("france", CaseStatus::Confirmed, 1000)
        .with_counts("france", CaseStatus::Recovered, 500)
        .with_counts("france", CaseStatus::Deaths, 100)
        .with_counts("italy", CaseStatus::Confirmed, 2000)
        .with_counts("italy", CaseStatus::Recovered, 1000)
        .with_counts("italy", CaseStatus::Deaths, 200);
    let messenger = RecordingMessenger::with_limit(150);
    handler_with(stats, Duration::ZERO)
        .handle_at(&direct("numbers for france and italy"), &messenger, day(3))
        .await;

    let texts = messenger.texts();
    assert_eq!(texts[0], replies::FETCHING);
    let parts = &texts[1..];
    assert!(parts.len() > 1);
    assert!(parts.iter().all(|part| part.chars().count() <= 150));
    let lines: Vec<&str> = parts.iter().flat_map(|part| part.lines()).collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        "Total number of confirmed cases in FRANCE as of 2020-04-03 is 1000"
    );
    assert_eq!(lines[5], "Total number of deaths in ITALY as of 2020-04-03 is 200");
}

#[tokio::test]
async fn unrecognised_text_gets_help() {
    let messenger = RecordingMessenger::new();
    handler()
        .handle_at(&group("@covidbot asdf qwerty"), &messenger, day(3))
        .await;
    assert_eq!(messenger.texts(), vec![replies::DEFAULT_HELP.to_owned()]);
}

#[tokio::test]
async fn small_talk_answers_before_topics() {
    let messenger = RecordingMessenger::new();
    handler()
        .handle_at(&direct("hi, how are you doing? any vaccine?"), &messenger, day(3))
        .await;
    assert_eq!(
        messenger.texts(),
        vec![
            "Hello @alice!".to_owned(),
            replies::WELLBEING.to_owned(),
            replies::topic_reply(Topic::Vaccine).to_owned(),
        ]
    );
}

#[tokio::test]
async fn plot_request_posts_counts_then_chart() {
    let stats = FakeStats::new()
        .with_counts("france", CaseStatus::Confirmed, 1000)
        .with_counts("italy", CaseStatus::Confirmed, 2000);
    let messenger = RecordingMessenger::new();
    handler_with(stats, Duration::ZERO)
        .handle_at(
            &group("@covidbot Plot confirmed cases in France and Italy"),
            &messenger,
            day(3),
        )
        .await;

    let sent = messenger.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], Sent::Text(replies::FETCHING.to_owned()));
    assert_eq!(
        sent[1],
        Sent::Text(
            "Total number of confirmed cases in FRANCE as of 2020-04-03 is 1000\n\
             Total number of confirmed cases in ITALY as of 2020-04-03 is 2000"
                .to_owned()
        )
    );
    assert!(matches!(&sent[2], Sent::File { filename, len } if filename == "plot.svg" && *len > 0));
}

#[tokio::test]
async fn unavailable_stats_send_only_the_fetching_notice() {
    let messenger = RecordingMessenger::new();
    handler()
        .handle_at(&direct("plot deaths in italy"), &messenger, day(3))
        .await;
    assert_eq!(messenger.sent(), vec![Sent::Text(replies::FETCHING.to_owned())]);
}

#[tokio::test]
async fn thanks_and_bye_reply_in_order() {
    let messenger = RecordingMessenger::new();
    handler()
        .handle_at(&direct("thanks, bye"), &messenger, day(3))
        .await;
    assert_eq!(
        messenger.texts(),
        vec![
            replies::topic_reply(Topic::Thanks).to_owned(),
            replies::topic_reply(Topic::Farewell).to_owned(),
        ]
    );
}

#[tokio::test]
async fn failed_send_does_not_stop_later_replies() {
    let messenger = RecordingMessenger::failing_first(1);
    let handled = handler()
        .handle_at(&direct("hello, what are the symptoms?"), &messenger, day(3))
        .await;
    assert!(handled);
    assert_eq!(
        messenger.texts(),
        vec![replies::topic_reply(Topic::Symptoms).to_owned()]
    );
}

#[tokio::test(start_paused = true)]
async fn topic_replies_are_paced() {
    let messenger = RecordingMessenger::new();
    let handler = handler_with(FakeStats::new(), Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    handler
        .handle_at(&direct("thanks, bye"), &messenger, day(3))
        .await;
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(messenger.texts().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn introduction_is_not_paced() {
    let messenger = RecordingMessenger::new();
    let handler = handler_with(FakeStats::new(), Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    handler
        .handle_at(&direct("tell me about yourself"), &messenger, day(3))
        .await;
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(
        messenger.texts(),
        vec![replies::topic_reply(Topic::SelfIntro).to_owned()]
    );
}
