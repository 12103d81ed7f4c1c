//! End-to-end check-in tests: mock upstream, real classifier and journal

use std::sync::Arc;

use emoticare::application::ports::CompletionClient;
use emoticare::application::{CheckInUseCase, SessionJournal};
use emoticare::domain::config::AppConfig;
use emoticare::domain::mood::MoodLabel;
use emoticare::infrastructure::{GeminiClient, JsonlJournalStore};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
}

fn use_case(
    server: &MockServer,
    journal: SessionJournal,
) -> CheckInUseCase<Arc<dyn CompletionClient>> {
    let config = AppConfig::defaults();
    let client: Arc<dyn CompletionClient> = Arc::new(
        GeminiClient::new("test-key").with_base_url(format!("{}/models", server.uri())),
    );
    CheckInUseCase::new(
        client,
        Arc::new(journal),
        config.safety_policy(),
        config.prompt_limits(),
    )
}

fn open_journal(path: &std::path::Path) -> SessionJournal {
    SessionJournal::open(Box::new(JsonlJournalStore::new(path))).unwrap()
}

#[tokio::test]
async fn happy_check_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("MOOD: Happy. Keep celebrating small wins."))
        .mount(&server)
        .await;

    let use_case = use_case(&server, SessionJournal::in_memory());
    let output = use_case.execute("I feel great today!").await.unwrap();

    assert_eq!(output.turn.mood_label(), MoodLabel::Happy);
    assert!(!output.turn.risk_flag());
    assert_eq!(output.payload.coaching_text, "Keep celebrating small wins.");
    assert!(output.payload.safety.is_none());
}

#[tokio::test]
async fn risky_input_shows_resources_whatever_the_model_says() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("MOOD: Neutral\nSounds like an ordinary day."))
        .mount(&server)
        .await;

    let use_case = use_case(&server, SessionJournal::in_memory());
    let output = use_case
        .execute("I don't want to be here anymore")
        .await
        .unwrap();

    assert!(output.turn.risk_flag());
    let notice = output.payload.safety.expect("safety notice");
    let contacts: Vec<&str> = notice.resources.iter().map(|r| r.contact.as_str()).collect();
    assert!(contacts.iter().any(|c| c.contains("988")));
    assert!(contacts.iter().any(|c| c.contains("findahelpline.com")));
    assert_eq!(output.payload.coaching_text, use_case.policy().message());
}

#[tokio::test]
async fn blocked_completion_still_flags_risk_from_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let use_case = use_case(&server, SessionJournal::in_memory());
    let output = use_case.execute("I want to kill myself").await.unwrap();

    assert_eq!(output.turn.mood_label(), MoodLabel::Other);
    assert!(output.turn.risk_flag());
    assert!(output.payload.safety.is_some());
}

#[tokio::test]
async fn upstream_failure_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let use_case = use_case(&server, open_journal(&path));

    let err = use_case.execute("hello").await.unwrap_err();
    assert_eq!(err.kind(), "upstream");
    assert!(use_case.journal().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn history_window_reaches_the_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("[Sad] my exam went badly"))
        .respond_with(reply("MOOD: Anxious\nIt is okay to worry."))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(reply("MOOD: Sad\nThat sounds disappointing."))
        .mount(&server)
        .await;

    let use_case = use_case(&server, SessionJournal::in_memory());
    let first = use_case.execute("my exam went badly").await.unwrap();
    let second = use_case.execute("what if I fail the year").await.unwrap();

    assert_eq!(first.turn.mood_label(), MoodLabel::Sad);
    assert_eq!(second.turn.mood_label(), MoodLabel::Anxious);
}

#[tokio::test]
async fn persisted_journal_reloads_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply("MOOD: Neutral\nThanks for checking in."))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");

    let written: Vec<_> = {
        let use_case = use_case(&server, open_journal(&path));
        for text in ["one", "two", "three"] {
            use_case.execute(text).await.unwrap();
        }
        use_case.journal().all()
    };

    let reopened = open_journal(&path);
    assert_eq!(reopened.all(), written);
    let inputs: Vec<String> = reopened
        .recent(3)
        .iter()
        .map(|t| t.input_text().to_string())
        .collect();
    assert_eq!(inputs, vec!["one", "two", "three"]);
    assert_eq!(reopened.next_id().value(), 4);
}

#[tokio::test]
async fn guidance_sections_survive_reload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(reply(
            "MOOD: Overwhelmed\nCONFIDENCE: 70\nSUMMARY: Juggling work deadlines and family duties\n\
             That is a lot to carry at once.\n\
             ACTIONS:\n- Breathe: Three slow breaths\n- Do now: Write down the top task\n- Plan: Ask for help with one chore\n\
             THEMES: pressure, responsibility\nPROMPTS:\n- What can you let go of this week?\n- Who could share the load?",
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.jsonl");
    let output = use_case(&server, open_journal(&path))
        .execute("work and home are both too much")
        .await
        .unwrap();

    assert_eq!(output.payload.coaching_text, "That is a lot to carry at once.");
    assert_eq!(
        output.payload.summary.as_deref(),
        Some("Juggling work deadlines and family duties")
    );
    assert_eq!(
        output.payload.actions.as_ref().and_then(|a| a.do_now.as_deref()),
        Some("Write down the top task")
    );

    let reopened = open_journal(&path).all();
    assert_eq!(reopened.len(), 1);
    let journaling = reopened[0].journaling().expect("journaling prompts persisted");
    assert_eq!(journaling.themes, vec!["pressure", "responsibility"]);
    assert_eq!(journaling.prompts.len(), 2);
}
