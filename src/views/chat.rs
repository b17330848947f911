//! Chat view
//!
//! Holds the transcript for one signed-in session. Each send appends the user
//! message immediately, asks the model for a reply to that message alone, and
//! appends the reply when it arrives. Only one exchange runs at a time.

use crate::auth::IdentityProvider;
use crate::llm::ChatModel;
use crate::markdown::{self, Document};
use crate::notify::Toaster;
use crate::types::{Message, MessageId, Sender, Session};
use crate::views::BusyFlag;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

pub const GREETING: &str =
    "Hello! I'm your AI assistant powered by Gemini. How can I help you today?";
pub const GREETING_ID: &str = "1";

/// Assistant replies longer than this many characters are rendered as markdown.
pub const MARKDOWN_THRESHOLD: usize = 100;

pub const FAILURE_MESSAGE: &str = "Failed to get AI response. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or an exchange is already running.
    Ignored,
    Replied,
    Failed,
}

/// Whether a message is shown through the markdown renderer.
pub fn renders_markdown(message: &Message) -> bool {
    !message.is_user() && message.text.chars().count() > MARKDOWN_THRESHOLD
}

fn greeting() -> Message {
    Message {
        id: MessageId::new(GREETING_ID),
        text: GREETING.to_string(),
        sender: Sender::Assistant,
        timestamp: Utc::now(),
    }
}

struct ChatState {
    messages: Vec<Message>,
    input: String,
    last_id: i64,
    focus_requested: bool,
}

impl ChatState {
    /// Millisecond timestamp, bumped when two messages land in the same millisecond.
    fn next_id(&mut self) -> MessageId {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        MessageId::new(id.to_string())
    }

    fn append(&mut self, sender: Sender, text: String) {
        let id = self.next_id();
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp: Utc::now(),
        });
    }
}

pub struct ChatView {
    session: Session,
    provider: Arc<dyn IdentityProvider>,
    model: Arc<dyn ChatModel>,
    toaster: Toaster,
    state: Mutex<ChatState>,
    busy: BusyFlag,
}

impl ChatView {
    pub fn new(
        session: Session,
        provider: Arc<dyn IdentityProvider>,
        model: Arc<dyn ChatModel>,
        toaster: Toaster,
    ) -> Self {
        tracing::info!(uid = %session.uid, model = model.model_name(), "Chat view created");
        Self {
            session,
            provider,
            model,
            toaster,
            state: Mutex::new(ChatState {
                messages: vec![greeting()],
                input: String::new(),
                last_id: 0,
                focus_requested: false,
            }),
            busy: BusyFlag::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Name shown next to "Signed in as".
    pub fn user_label(&self) -> String {
        self.session.display_label()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn input(&self) -> String {
        self.state.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state.lock().input = text.into();
    }

    /// Send the current input buffer.
    pub async fn send_input(&self) -> SendOutcome {
        let text = self.input();
        self.send_message(&text).await
    }

    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(_busy) = self.busy.try_acquire() else {
            tracing::debug!("Send ignored while a reply is pending");
            return SendOutcome::Ignored;
        };

        {
            let mut state = self.state.lock();
            state.append(Sender::User, text.to_string());
            state.input.clear();
        }

        let outcome = match self.model.generate(text).await {
            Ok(reply) => {
                self.state.lock().append(Sender::Assistant, reply);
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::error!(model = self.model.model_name(), "Error calling AI model: {}", e);
                self.toaster.error(FAILURE_MESSAGE);
                SendOutcome::Failed
            }
        };

        self.state.lock().focus_requested = true;
        outcome
    }

    /// Whether the input should regain focus; reading clears the request.
    pub fn take_focus_request(&self) -> bool {
        std::mem::take(&mut self.state.lock().focus_requested)
    }

    pub fn clear_chat(&self) {
        self.state.lock().messages = vec![greeting()];
        self.toaster.success("Chat cleared");
    }

    /// Sign out through the identity provider. The transcript is left as is.
    pub async fn sign_out(&self) -> bool {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.toaster.success("Signed out successfully");
                true
            }
            Err(e) => {
                tracing::error!("Error signing out: {}", e);
                self.toaster.error("Error signing out. Please try again");
                false
            }
        }
    }

    /// The transcript as an HTML fragment.
    pub fn export_html(&self) -> String {
        let messages = self.messages();
        let mut out = String::from("<section class=\"transcript\">\n");
        for message in &messages {
            let body = if renders_markdown(message) {
                markdown::html::render(&Document::parse(&message.text))
            } else {
                format!("<p>{}</p>", markdown::html::render_plain(&message.text))
            };
            out.push_str(&format!(
                "<article class=\"message {}\" data-id=\"{}\">{}<time datetime=\"{}\">{}</time></article>\n",
                match message.sender {
                    Sender::User => "user",
                    Sender::Assistant => "assistant",
                },
                markdown::html::escape(message.id.as_str()),
                body,
                message.timestamp.to_rfc3339(),
                message.timestamp.format("%H:%M"),
            ));
        }
        out.push_str("</section>\n");
        out
    }
}
