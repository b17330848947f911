//! AI Client Adapter
//!
//! The chat view talks to a [`ChatModel`]; [`GeminiClient`] is the
//! production implementation backed by Google's generative-language API.
//!
//! # Example
//!
//! ```ignore
//! use mrbot::llm::{ChatModel, GeminiClient};
//!
//! let client = GeminiClient::new(&config.gemini);
//! let reply = client.generate("What is 2+2?").await?;
//! println!("{}", reply);
//! ```

/// `ChatModel` trait and `LlmError`.
pub mod client;
/// Gemini `generateContent` client.
pub mod gemini;

pub use client::{ChatModel, LlmError};
pub use gemini::GeminiClient;
