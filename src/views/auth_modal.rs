//! Sign-in / sign-up / password-reset dialog
//!
//! ```text
//!            open()                 toggle_mode()
//! Closed ────────────▶ LoginForm ◀──────────────▶ SignupForm
//!   ▲                  │      ▲
//!   │ close() or       │      │ back_to_sign_in() or reset sent
//!   │ sign-in success  ▼      │
//!   └──────────── ForgotPasswordForm
//! ```
//!
//! Every submission holds the busy flag for its whole duration. While busy,
//! all transitions and edits are refused.

use crate::auth::{AuthError, FederatedCredential, IdentityProvider};
use crate::notify::{Toast, Toaster};
use crate::views::BusyFlag;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the console hint follows a configuration-class error.
pub const CONSOLE_HINT_DELAY: Duration = Duration::from_secs(1);
pub const CONSOLE_HINT_DURATION: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    LoginForm,
    SignupForm,
    ForgotPasswordForm,
}

impl ModalState {
    pub fn title(self) -> &'static str {
        match self {
            ModalState::LoginForm | ModalState::Closed => "Welcome Back",
            ModalState::SignupForm => "Create Account",
            ModalState::ForgotPasswordForm => "Reset Password",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            ModalState::LoginForm | ModalState::Closed => "Sign in to your account",
            ModalState::SignupForm => "Join us today",
            ModalState::ForgotPasswordForm => "Enter your email to reset password",
        }
    }

    pub fn submit_label(self, busy: bool) -> &'static str {
        match (self, busy) {
            (ModalState::ForgotPasswordForm, true) => "Sending...",
            (ModalState::ForgotPasswordForm, false) => "Send Reset Email",
            (_, true) => "Processing...",
            (ModalState::SignupForm, false) => "Create Account",
            (_, false) => "Sign In",
        }
    }

    /// Label of the link that switches between sign-in and sign-up.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ModalState::SignupForm => "Already have an account? Sign in",
            _ => "Don't have an account? Sign up",
        }
    }

    fn accepts_credentials(self) -> bool {
        matches!(self, ModalState::LoginForm | ModalState::SignupForm)
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Not applicable in the current state, or another submission is running.
    Ignored,
    /// Stopped before contacting the provider (empty fields or bad configuration).
    Rejected,
    Succeeded,
    Failed(AuthError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded)
    }
}

#[derive(Debug, Default)]
struct Form {
    state: ModalState,
    email: String,
    password: String,
    show_password: bool,
}

pub struct AuthModal {
    provider: Arc<dyn IdentityProvider>,
    toaster: Toaster,
    form: Mutex<Form>,
    busy: BusyFlag,
}

impl AuthModal {
    pub fn new(provider: Arc<dyn IdentityProvider>, toaster: Toaster) -> Self {
        Self {
            provider,
            toaster,
            form: Mutex::new(Form::default()),
            busy: BusyFlag::new(),
        }
    }

    pub fn state(&self) -> ModalState {
        self.form.lock().state
    }

    pub fn is_open(&self) -> bool {
        self.state() != ModalState::Closed
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn email(&self) -> String {
        self.form.lock().email.clone()
    }

    pub fn password(&self) -> String {
        self.form.lock().password.clone()
    }

    pub fn is_password_visible(&self) -> bool {
        self.form.lock().show_password
    }

    /// The password as the field shows it: masked unless visibility is toggled on.
    pub fn password_display(&self) -> String {
        let form = self.form.lock();
        if form.show_password {
            form.password.clone()
        } else {
            "•".repeat(form.password.chars().count())
        }
    }

    pub fn open(&self) -> bool {
        self.transition(|state| match state {
            ModalState::Closed => Some(ModalState::LoginForm),
            _ => None,
        })
    }

    /// Close and reset every field.
    pub fn close(&self) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        *self.form.lock() = Form::default();
        true
    }

    pub fn toggle_mode(&self) -> bool {
        self.transition(|state| match state {
            ModalState::LoginForm => Some(ModalState::SignupForm),
            ModalState::SignupForm => Some(ModalState::LoginForm),
            _ => None,
        })
    }

    pub fn show_forgot_password(&self) -> bool {
        self.transition(|state| match state {
            ModalState::LoginForm => Some(ModalState::ForgotPasswordForm),
            _ => None,
        })
    }

    pub fn back_to_sign_in(&self) -> bool {
        self.transition(|state| match state {
            ModalState::ForgotPasswordForm => Some(ModalState::LoginForm),
            _ => None,
        })
    }

    pub fn set_email(&self, email: impl Into<String>) -> bool {
        self.edit(|form| form.email = email.into())
    }

    pub fn set_password(&self, password: impl Into<String>) -> bool {
        self.edit(|form| form.password = password.into())
    }

    pub fn toggle_password_visibility(&self) -> bool {
        self.edit(|form| form.show_password = !form.show_password)
    }

    /// Sign in or sign up, depending on the form shown.
    pub async fn submit_credentials(&self) -> SubmitOutcome {
        let Some(_busy) = self.busy.try_acquire() else {
            return SubmitOutcome::Ignored;
        };

        let (mode, email, password) = {
            let form = self.form.lock();
            if !form.state.accepts_credentials() {
                return SubmitOutcome::Ignored;
            }
            (form.state, form.email.trim().to_string(), form.password.clone())
        };

        if email.is_empty() || password.trim().is_empty() {
            self.toaster.error("Please fill in all fields.");
            return SubmitOutcome::Rejected;
        }

        let report = self.provider.validate().await;
        if !report.is_valid() {
            tracing::error!(errors = ?report.errors, "Identity configuration is invalid");
            self.toaster
                .error("Firebase configuration error. Please check the console for details.");
            return SubmitOutcome::Rejected;
        }

        let result = match mode {
            ModalState::SignupForm => self.provider.sign_up(&email, &password).await,
            _ => self.provider.sign_in(&email, &password).await,
        };

        match result {
            Ok(_) => {
                self.toaster.success(match mode {
                    ModalState::SignupForm => "Welcome! Account created successfully.",
                    _ => "Welcome back! Successfully signed in.",
                });
                self.reset();
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                self.report_failure(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Sign in with a token from Google or GitHub.
    pub async fn submit_federated(&self, credential: FederatedCredential) -> SubmitOutcome {
        let Some(_busy) = self.busy.try_acquire() else {
            return SubmitOutcome::Ignored;
        };
        if !self.state().accepts_credentials() {
            return SubmitOutcome::Ignored;
        }

        let provider = credential.provider;
        match self.provider.sign_in_with_provider(credential).await {
            Ok(_) => {
                self.toaster.success(format!(
                    "Welcome! Successfully signed in with {}.",
                    provider.name()
                ));
                self.reset();
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                self.report_failure(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub async fn submit_password_reset(&self) -> SubmitOutcome {
        let Some(_busy) = self.busy.try_acquire() else {
            return SubmitOutcome::Ignored;
        };

        let email = {
            let form = self.form.lock();
            if form.state != ModalState::ForgotPasswordForm {
                return SubmitOutcome::Ignored;
            }
            form.email.trim().to_string()
        };

        if email.is_empty() {
            self.toaster.error("Please enter your email address first.");
            return SubmitOutcome::Rejected;
        }

        match self.provider.send_password_reset(&email).await {
            Ok(()) => {
                self.toaster
                    .success("Password reset email sent! Check your inbox.");
                self.form.lock().state = ModalState::LoginForm;
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                self.report_failure(&e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn transition(&self, next: impl FnOnce(ModalState) -> Option<ModalState>) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        let mut form = self.form.lock();
        match next(form.state) {
            Some(state) => {
                tracing::debug!(from = ?form.state, to = ?state, "Auth modal transition");
                form.state = state;
                true
            }
            None => false,
        }
    }

    fn edit(&self, apply: impl FnOnce(&mut Form)) -> bool {
        if self.busy.is_busy() {
            return false;
        }
        let mut form = self.form.lock();
        if form.state == ModalState::Closed {
            return false;
        }
        apply(&mut form);
        true
    }

    fn reset(&self) {
        *self.form.lock() = Form::default();
    }

    fn report_failure(&self, error: &AuthError) {
        tracing::error!(code = %error.code(), "Authentication error: {}", error);
        self.toaster.error(error.user_message());

        if error.needs_console_hint() {
            self.toaster.schedule(
                CONSOLE_HINT_DELAY,
                Toast::error(format!(
                    "Please check Firebase console: {}",
                    self.provider.console_url()
                ))
                .with_duration(CONSOLE_HINT_DURATION),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_per_state() {
        assert_eq!(ModalState::LoginForm.title(), "Welcome Back");
        assert_eq!(ModalState::SignupForm.subtitle(), "Join us today");
        assert_eq!(
            ModalState::ForgotPasswordForm.subtitle(),
            "Enter your email to reset password"
        );
        assert_eq!(ModalState::SignupForm.submit_label(false), "Create Account");
        assert_eq!(ModalState::LoginForm.submit_label(true), "Processing...");
        assert_eq!(
            ModalState::ForgotPasswordForm.submit_label(true),
            "Sending..."
        );
        assert_eq!(
            ModalState::LoginForm.toggle_label(),
            "Don't have an account? Sign up"
        );
        assert_eq!(
            ModalState::SignupForm.toggle_label(),
            "Already have an account? Sign in"
        );
    }
}
