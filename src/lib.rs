//! # MRBOT
//!
//! A chat client that signs users in through Firebase Authentication and
//! answers their messages with Google's Gemini.
//!
//! ## Overview
//!
//! MRBOT can be used in two ways:
//!
//! 1. **As an app** - Run the `mrbot` binary for the interactive terminal client
//! 2. **As a library** - Drive the headless views from your own front-end
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use mrbot::{Config, Dashboard, Screen, Toaster};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mrbot::Result<()> {
//!     let config = Config::load(None)?;
//!     let (toaster, mut toasts) = Toaster::channel();
//!     let (mut dashboard, auth) = Dashboard::from_config(&config, toaster);
//!     tokio::spawn(async move { auth.restore().await });
//!
//!     dashboard.settled().await;
//!     if let Screen::Chat(chat) = dashboard.screen() {
//!         chat.send_message("Hello!").await;
//!         for message in chat.messages() {
//!             println!("{}", message.text);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`utils::config`] - environment configuration
//! - [`auth`] - identity provider trait and Firebase REST adapter
//! - [`session`] - session state stream and context
//! - [`llm`] - chat model trait and Gemini client
//! - [`markdown`] - markdown subset for assistant replies
//! - [`notify`] - toast notifications
//! - [`views`] - headless dashboard, auth modal, chat, diagnostics
//! - [`cli`] - terminal front-end
//! - [`types`] - common types and error handling
//!
//! ## Architecture
//!
//! Configuration gates startup. The identity adapter publishes the auth state;
//! the dashboard observes it through a [`SessionContext`] and shows the
//! landing page, the auth modal, or the chat view. The chat view talks to the
//! model directly and keeps its transcript in memory.

#![warn(rustdoc::missing_crate_level_docs)]

/// Identity provider abstraction and the Firebase implementation.
pub mod auth;
/// Command-line interface and terminal front-end.
pub mod cli;
/// Chat model abstraction and the Gemini client.
pub mod llm;
/// Markdown parsing and rendering.
pub mod markdown;
/// Toast notifications.
pub mod notify;
/// Session state shared between the identity adapter and the views.
pub mod session;
/// Core types and error handling.
pub mod types;
/// Configuration.
pub mod utils;
/// Headless views.
pub mod views;

pub use auth::{AuthError, FederatedCredential, FederatedProvider, FirebaseAuth, IdentityProvider};
pub use llm::{ChatModel, GeminiClient, LlmError};
pub use notify::{Toast, ToastKind, ToastReceiver, Toaster};
pub use session::{AuthState, SessionContext, SessionPublisher, Subscription};
pub use types::{AppError, Message, MessageId, Result, Sender, Session};
pub use utils::config::{Config, ConfigError, FirebaseConfig, GeminiConfig};
pub use views::auth_modal::{AuthModal, ModalState, SubmitOutcome};
pub use views::chat::{ChatView, SendOutcome};
pub use views::dashboard::{Dashboard, Screen};
pub use views::diagnostic::{DiagnosticReport, DiagnosticReporter};
pub use views::theme::Theme;
pub use views::Exit;
