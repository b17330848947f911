//! Identity Client Adapter
//!
//! Everything the app knows about signing users in goes through the
//! [`IdentityProvider`] trait. The production implementation,
//! [`FirebaseAuth`](firebase::FirebaseAuth), talks to the Firebase
//! Authentication REST API; tests substitute in-memory providers.
//!
//! # Module Structure
//!
//! - [`auth::error`](crate::auth::error) - `AuthError` and the user-facing message table
//! - [`auth::firebase`](crate::auth::firebase) - Identity Toolkit / Secure Token REST client
//! - [`auth::persistence`](crate::auth::persistence) - refresh-token file used to restore sessions
//! - [`auth::validator`](crate::auth::validator) - configuration completeness and reachability probe
//!
//! # Session changes
//!
//! Providers never hand state to views directly. Every sign-in, sign-up and
//! sign-out is published on a [`SessionPublisher`](crate::session::SessionPublisher)
//! and observed through [`SessionContext`](crate::session::SessionContext).

/// `AuthError` and the mapping to user-facing messages.
pub mod error;
/// Firebase Authentication REST implementation.
pub mod firebase;
/// Refresh-token persistence between runs.
pub mod persistence;
/// Configuration validation and the auth-domain reachability probe.
pub mod validator;

pub use error::AuthError;
pub use firebase::FirebaseAuth;
pub use validator::ValidationReport;

use crate::session::Subscription;
use crate::types::Session;
use async_trait::async_trait;
use std::fmt;

/// External identity providers offered next to email/password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    Google,
    GitHub,
}

impl FederatedProvider {
    pub const ALL: [FederatedProvider; 2] = [FederatedProvider::Google, FederatedProvider::GitHub];

    /// Name used in notifications ("Successfully signed in with Google").
    pub fn name(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "Google",
            FederatedProvider::GitHub => "GitHub",
        }
    }

    /// Provider id understood by `accounts:signInWithIdp`.
    pub fn provider_id(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "google.com",
            FederatedProvider::GitHub => "github.com",
        }
    }

    /// Which OAuth token the provider hands out.
    pub fn token_param(&self) -> &'static str {
        match self {
            FederatedProvider::Google => "id_token",
            FederatedProvider::GitHub => "access_token",
        }
    }
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// OAuth token obtained from a federated provider's own sign-in flow.
#[derive(Clone, PartialEq, Eq)]
pub struct FederatedCredential {
    pub provider: FederatedProvider,
    pub token: String,
}

impl FederatedCredential {
    pub fn new(provider: FederatedProvider, token: impl Into<String>) -> Self {
        Self {
            provider,
            token: token.into(),
        }
    }
}

impl fmt::Debug for FederatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederatedCredential")
            .field("provider", &self.provider)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Identity provider operations consumed by the views.
///
/// Every operation either resolves with the new session or fails with an
/// [`AuthError`]. Successful operations also publish the new state on the
/// provider's session stream.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Email/password sign-in.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Email/password account creation; signs the new user in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Sign in with a federated provider's OAuth token, replacing any session.
    async fn sign_in_with_provider(
        &self,
        credential: FederatedCredential,
    ) -> Result<Session, AuthError>;

    /// Dispatch a password-reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Clear the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to session changes. Dropping the subscription unsubscribes.
    fn subscribe(&self) -> Subscription;

    /// Re-check configuration completeness and provider reachability.
    async fn validate(&self) -> ValidationReport;

    /// Console page where sign-in methods are managed.
    fn console_url(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federated_provider_ids() {
        assert_eq!(FederatedProvider::Google.provider_id(), "google.com");
        assert_eq!(FederatedProvider::GitHub.provider_id(), "github.com");
        assert_eq!(FederatedProvider::Google.token_param(), "id_token");
        assert_eq!(FederatedProvider::GitHub.token_param(), "access_token");
    }

    #[test]
    fn test_credential_debug_redacts_token() {
        let credential = FederatedCredential::new(FederatedProvider::GitHub, "gho_secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("gho_secret"));
        assert!(debug.contains("GitHub"));
    }
}
