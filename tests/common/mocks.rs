//! Mock implementations for testing.
//!
//! In-memory identity provider and chat model that can be scripted to
//! succeed, fail or stall, shared across the view tests.

use async_trait::async_trait;
use mrbot::auth::{AuthError, FederatedCredential, IdentityProvider, ValidationReport};
use mrbot::llm::{ChatModel, LlmError};
use mrbot::session::{SessionPublisher, Subscription};
use mrbot::types::Session;
use parking_lot::Mutex;
use std::time::Duration;

pub const CONSOLE_URL: &str =
    "https://console.firebase.google.com/project/mrbot-test/authentication/providers";

/// Identity provider whose results are set by the test.
///
/// Starts in `Loading` like the real adapter; call [`MockIdentity::resolve`]
/// to report signed out, or [`MockIdentity::restore_as`] to report a session.
pub struct MockIdentity {
    publisher: SessionPublisher,
    failure: Mutex<Option<AuthError>>,
    sign_out_failure: Mutex<Option<AuthError>>,
    validation_errors: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentity {
    pub fn new() -> Self {
        Self {
            publisher: SessionPublisher::new(),
            failure: Mutex::new(None),
            sign_out_failure: Mutex::new(None),
            validation_errors: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider that has already reported "signed out".
    pub fn signed_out() -> Self {
        let mock = Self::new();
        mock.resolve();
        mock
    }

    pub fn resolve(&self) {
        self.publisher.signed_out();
    }

    pub fn restore_as(&self, session: Session) {
        self.publisher.signed_in(session);
    }

    /// Make every account operation fail with `error`.
    pub fn fail_with(&self, error: AuthError) {
        *self.failure.lock() = Some(error);
    }

    pub fn fail_sign_out_with(&self, error: AuthError) {
        *self.sign_out_failure.lock() = Some(error);
    }

    pub fn invalid_config(&self, errors: &[&str]) {
        *self.validation_errors.lock() = errors.iter().map(|e| e.to_string()).collect();
    }

    /// Hold every account operation for `delay` before answering.
    pub fn stall_for(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Operations invoked so far, e.g. `sign_in:user@example.com`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn answer(&self, call: String) -> Result<(), AuthError> {
        self.calls.lock().push(call);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failure.lock().clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn establish(&self, session: Session) -> Session {
        self.publisher.signed_in(session.clone());
        session
    }
}

pub fn session_for(email: &str) -> Session {
    let local = email.split('@').next().unwrap_or(email);
    Session::new(format!("uid-{}", local)).with_email(email)
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        self.answer(format!("sign_in:{}", email)).await?;
        Ok(self.establish(session_for(email)))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        self.answer(format!("sign_up:{}", email)).await?;
        Ok(self.establish(session_for(email)))
    }

    async fn sign_in_with_provider(
        &self,
        credential: FederatedCredential,
    ) -> Result<Session, AuthError> {
        if credential.token.trim().is_empty() {
            self.calls
                .lock()
                .push(format!("sign_in_with_provider:{}", credential.provider));
            return Err(AuthError::PopupClosedByUser);
        }
        self.answer(format!("sign_in_with_provider:{}", credential.provider))
            .await?;
        let session = Session::new(format!("uid-{}", credential.provider.provider_id()))
            .with_display_name(format!("{} User", credential.provider));
        Ok(self.establish(session))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.answer(format!("send_password_reset:{}", email)).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.calls.lock().push("sign_out".to_string());
        let failure = self.sign_out_failure.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.publisher.signed_out();
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    async fn validate(&self) -> ValidationReport {
        ValidationReport {
            errors: self.validation_errors.lock().clone(),
        }
    }

    fn console_url(&self) -> String {
        CONSOLE_URL.to_string()
    }
}

/// Chat model with a canned reply or failure.
pub struct MockChatModel {
    reply: Result<String, LlmError>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockChatModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(LlmError::Status {
                status: 500,
                message: "Internal error".to_string(),
            }),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every prompt the model was asked to answer.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
