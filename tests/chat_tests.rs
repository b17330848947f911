//! Chat view tests, against both a mock Gemini server and an in-memory model.

mod common;

use common::mocks::{MockChatModel, MockIdentity};
use mrbot::auth::{AuthError, IdentityProvider};
use mrbot::llm::{ChatModel, GeminiClient};
use mrbot::notify::{ToastReceiver, Toaster};
use mrbot::types::{Sender, Session};
use mrbot::utils::config::GeminiConfig;
use mrbot::views::chat::{ChatView, SendOutcome, FAILURE_MESSAGE, GREETING, GREETING_ID};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> Session {
    Session::new("u1").with_email("user@example.com")
}

fn chat_with(model: Arc<dyn ChatModel>) -> (ChatView, Arc<MockIdentity>, ToastReceiver) {
    let identity = Arc::new(MockIdentity::new());
    identity.restore_as(user());
    let (toaster, toasts) = Toaster::channel();
    (
        ChatView::new(user(), identity.clone(), model, toaster),
        identity,
        toasts,
    )
}

async fn gemini_replying(status: u16, body: serde_json::Value) -> (MockServer, GeminiClient) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    let client = GeminiClient::new(&GeminiConfig {
        api_key: "gemini-key".to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_base: server.uri(),
    });
    (server, client)
}

fn transcript(chat: &ChatView) -> Vec<(Sender, String)> {
    chat.messages()
        .into_iter()
        .map(|m| (m.sender, m.text))
        .collect()
}

#[test]
fn test_new_chat_starts_with_greeting() {
    let (chat, _identity, _toasts) = chat_with(Arc::new(MockChatModel::new("unused")));

    let messages = chat.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id.as_str(), GREETING_ID);
    assert_eq!(messages[0].sender, Sender::Assistant);
    assert_eq!(messages[0].text, GREETING);
    assert_eq!(chat.user_label(), "user");
}

#[tokio::test]
async fn test_successful_exchange_appends_reply() {
    let (_server, gemini) = gemini_replying(
        200,
        json!({"candidates": [{"content": {"parts": [{"text": "Hi there!"}]}}]}),
    )
    .await;
    let (chat, _identity, mut toasts) = chat_with(Arc::new(gemini));

    let outcome = chat.send_message("Hello").await;

    assert_eq!(outcome, SendOutcome::Replied);
    assert_eq!(
        transcript(&chat),
        vec![
            (Sender::Assistant, GREETING.to_string()),
            (Sender::User, "Hello".to_string()),
            (Sender::Assistant, "Hi there!".to_string()),
        ]
    );
    assert!(toasts.drain().is_empty());
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn test_server_error_keeps_user_message_and_notifies() {
    let (_server, gemini) = gemini_replying(
        500,
        json!({"error": {"code": 500, "message": "Internal error", "status": "INTERNAL"}}),
    )
    .await;
    let (chat, _identity, mut toasts) = chat_with(Arc::new(gemini));

    let outcome = chat.send_message("Hello").await;

    assert_eq!(outcome, SendOutcome::Failed);
    assert_eq!(
        transcript(&chat),
        vec![
            (Sender::Assistant, GREETING.to_string()),
            (Sender::User, "Hello".to_string()),
        ]
    );
    let toasts = toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error());
    assert_eq!(toasts[0].text, FAILURE_MESSAGE);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn test_missing_candidate_counts_as_failure() {
    let (_server, gemini) = gemini_replying(200, json!({"candidates": []})).await;
    let (chat, _identity, mut toasts) = chat_with(Arc::new(gemini));

    assert_eq!(chat.send_message("Hello").await, SendOutcome::Failed);
    assert_eq!(chat.messages().len(), 2);
    assert_eq!(toasts.drain()[0].text, FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let model = Arc::new(MockChatModel::new("reply"));
    let (chat, _identity, _toasts) = chat_with(model.clone());

    assert_eq!(chat.send_message("").await, SendOutcome::Ignored);
    assert_eq!(chat.send_message("  \n\t ").await, SendOutcome::Ignored);

    assert_eq!(chat.messages().len(), 1);
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn test_only_latest_message_is_sent() {
    let model = Arc::new(MockChatModel::new("reply"));
    let (chat, _identity, _toasts) = chat_with(model.clone());

    chat.send_message("first").await;
    chat.send_message("second").await;

    assert_eq!(model.prompts(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(chat.messages().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_send_while_pending_is_a_no_op() {
    let model = Arc::new(MockChatModel::new("slow reply").with_delay(Duration::from_secs(2)));
    let (chat, _identity, _toasts) = chat_with(model.clone());

    let second = async {
        tokio::task::yield_now().await;
        assert!(chat.is_busy());
        chat.send_message("again").await
    };
    let (first, second) = tokio::join!(chat.send_message("Hello"), second);

    assert_eq!(first, SendOutcome::Replied);
    assert_eq!(second, SendOutcome::Ignored);
    assert_eq!(model.prompts(), vec!["Hello".to_string()]);
    assert_eq!(
        transcript(&chat),
        vec![
            (Sender::Assistant, GREETING.to_string()),
            (Sender::User, "Hello".to_string()),
            (Sender::Assistant, "slow reply".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_user_message_appears_before_reply() {
    let model = Arc::new(MockChatModel::new("done").with_delay(Duration::from_secs(1)));
    let (chat, _identity, _toasts) = chat_with(model);

    let observe = async {
        tokio::task::yield_now().await;
        transcript(&chat)
    };
    let (_, during) = tokio::join!(chat.send_message("Hello"), observe);

    assert_eq!(during.len(), 2);
    assert_eq!(during[1], (Sender::User, "Hello".to_string()));
}

#[tokio::test]
async fn test_send_input_clears_buffer_and_requests_focus() {
    let (chat, _identity, _toasts) = chat_with(Arc::new(MockChatModel::new("reply")));

    chat.set_input("Hello");
    assert_eq!(chat.input(), "Hello");
    assert!(!chat.take_focus_request());

    assert_eq!(chat.send_input().await, SendOutcome::Replied);
    assert_eq!(chat.input(), "");
    assert!(chat.take_focus_request());
    assert!(!chat.take_focus_request());
}

#[tokio::test]
async fn test_focus_returns_after_failure_too() {
    let (chat, _identity, _toasts) = chat_with(Arc::new(MockChatModel::failing()));

    chat.send_message("Hello").await;
    assert!(chat.take_focus_request());
}

#[tokio::test]
async fn test_message_ids_are_unique_and_increasing() {
    let (chat, _identity, _toasts) = chat_with(Arc::new(MockChatModel::new("reply")));

    for text in ["a", "b", "c"] {
        chat.send_message(text).await;
    }

    let ids: Vec<i64> = chat.messages()[1..]
        .iter()
        .map(|m| m.id.as_str().parse().unwrap())
        .collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_clear_chat_resets_to_greeting() {
    let (chat, _identity, mut toasts) = chat_with(Arc::new(MockChatModel::new("reply")));
    chat.send_message("Hello").await;

    chat.clear_chat();

    let messages = chat.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id.as_str(), GREETING_ID);
    let toasts = toasts.drain();
    assert_eq!(toasts.last().map(|t| t.text.as_str()), Some("Chat cleared"));
}

#[tokio::test]
async fn test_sign_out_ends_session() {
    let (chat, identity, mut toasts) = chat_with(Arc::new(MockChatModel::new("reply")));

    assert!(chat.sign_out().await);

    assert!(identity.subscribe().state().session().is_none());
    assert_eq!(identity.calls(), vec!["sign_out".to_string()]);
    assert_eq!(toasts.drain()[0].text, "Signed out successfully");
}

#[tokio::test]
async fn test_failed_sign_out_keeps_session() {
    let (chat, identity, mut toasts) = chat_with(Arc::new(MockChatModel::new("reply")));
    identity.fail_sign_out_with(AuthError::NetworkRequestFailed);

    assert!(!chat.sign_out().await);

    assert!(identity.subscribe().state().session().is_some());
    let toast = toasts.drain().remove(0);
    assert!(toast.is_error());
    assert_eq!(toast.text, "Error signing out. Please try again");
}

#[tokio::test]
async fn test_export_escapes_user_text_and_renders_long_replies() {
    let reply = "Here is a **bold** answer that goes on long enough to be rendered as markdown.\n\n- first point\n- second point";
    assert!(reply.chars().count() > 100);
    let (chat, _identity, _toasts) = chat_with(Arc::new(MockChatModel::new(reply)));

    chat.send_message("<script>alert(1)</script>\nsecond line").await;
    let html = chat.export_html();

    assert!(html.starts_with("<section class=\"transcript\">"));
    assert!(html.contains("<article class=\"message assistant\" data-id=\"1\">"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;<br>second line"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains("<li>first point</li>"));
    assert_eq!(html.matches("<article").count(), 3);
}
