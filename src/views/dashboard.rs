//! Top-level routing between the loading indicator, the landing page and the chat.

use crate::auth::{FirebaseAuth, IdentityProvider};
use crate::llm::{ChatModel, GeminiClient};
use crate::notify::Toaster;
use crate::session::{AuthState, SessionContext};
use crate::utils::config::Config;
use crate::views::auth_modal::AuthModal;
use crate::views::chat::ChatView;
use crate::views::theme::Theme;
use std::sync::Arc;

pub const TITLE: &str = "MRBOT";
pub const TAGLINE: &str = "Experience the future of AI conversation with MRBOT. Get instant answers, creative solutions, and professional assistance powered by advanced AI technology.";
pub const HIGHLIGHTS: [&str; 3] = ["Natural Conversations", "Instant Responses", "Secure & Private"];
pub const CALL_TO_ACTION: &str = "Start Chatting Now";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature {
        title: "Smart Conversations",
        description: "Engage in natural, intelligent conversations with our advanced AI powered by Google's Gemini.",
    },
    Feature {
        title: "Lightning Fast",
        description: "Get instant responses with minimal latency. Our optimized infrastructure ensures smooth interactions.",
    },
    Feature {
        title: "Secure & Private",
        description: "Your conversations are protected with enterprise-grade security and Firebase authentication.",
    },
];

/// What the dashboard shows for the current auth state.
#[derive(Clone)]
pub enum Screen {
    Loading,
    Landing,
    Chat(Arc<ChatView>),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Loading => "loading",
            Screen::Landing => "landing",
            Screen::Chat(_) => "chat",
        }
    }
}

pub struct Dashboard {
    provider: Arc<dyn IdentityProvider>,
    model: Arc<dyn ChatModel>,
    toaster: Toaster,
    session: SessionContext,
    auth_modal: AuthModal,
    chat: Option<Arc<ChatView>>,
    theme: Theme,
}

impl Dashboard {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        model: Arc<dyn ChatModel>,
        toaster: Toaster,
    ) -> Self {
        let session = SessionContext::mount(provider.as_ref());
        let auth_modal = AuthModal::new(provider.clone(), toaster.clone());
        Self {
            provider,
            model,
            toaster,
            session,
            auth_modal,
            chat: None,
            theme: Theme::default(),
        }
    }

    /// Wire the production adapters. The returned handle is used to restore a stored session.
    pub fn from_config(config: &Config, toaster: Toaster) -> (Self, Arc<FirebaseAuth>) {
        let auth = Arc::new(FirebaseAuth::from_config(config));
        let model = Arc::new(GeminiClient::new(&config.gemini));
        (Self::new(auth.clone(), model, toaster), auth)
    }

    /// Screen for the latest auth state.
    ///
    /// A chat view is created when a session appears and dropped when it goes
    /// away, so each session starts from the greeting.
    pub fn screen(&mut self) -> Screen {
        match self.session.state() {
            AuthState::Loading => {
                self.chat = None;
                Screen::Loading
            }
            AuthState::SignedOut => {
                if self.chat.take().is_some() {
                    tracing::info!("Session ended, returning to landing page");
                }
                Screen::Landing
            }
            AuthState::SignedIn(session) => {
                let current = self
                    .chat
                    .as_ref()
                    .is_some_and(|chat| chat.session().uid == session.uid);
                if !current {
                    self.chat = Some(Arc::new(ChatView::new(
                        session,
                        self.provider.clone(),
                        self.model.clone(),
                        self.toaster.clone(),
                    )));
                }
                match &self.chat {
                    Some(chat) => Screen::Chat(chat.clone()),
                    None => Screen::Loading,
                }
            }
        }
    }

    /// Open the sign-in dialog from the landing page's call to action.
    pub fn open_auth(&self) -> bool {
        match self.session.state() {
            AuthState::SignedOut => self.auth_modal.open(),
            _ => false,
        }
    }

    pub fn auth_modal(&self) -> &AuthModal {
        &self.auth_modal
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Wait for the next auth state change.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.session.changed().await
    }

    /// Wait until the identity provider has resolved the initial state.
    pub async fn settled(&mut self) -> AuthState {
        self.session.settled().await
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
