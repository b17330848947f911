//! Firebase Authentication over REST
//!
//! Uses the Identity Toolkit endpoints for account operations and the Secure
//! Token endpoint to restore a persisted session:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | sign in | `accounts:signInWithPassword` |
//! | sign up | `accounts:signUp` |
//! | federated sign in | `accounts:signInWithIdp` |
//! | password reset | `accounts:sendOobCode` (`PASSWORD_RESET`) |
//! | restore | `token` (`grant_type=refresh_token`) then `accounts:lookup` |
//!
//! The adapter starts in `Loading`; [`FirebaseAuth::restore`] resolves it to
//! signed in or signed out.

use crate::auth::persistence::{SessionStore, StoredSession};
use crate::auth::validator::{validate_firebase, ValidationReport};
use crate::auth::{AuthError, FederatedCredential, IdentityProvider};
use crate::session::{SessionPublisher, Subscription};
use crate::types::Session;
use crate::utils::config::{Config, FirebaseConfig};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Redirect URI sent with `signInWithIdp`; the token is supplied directly so it is never visited.
const IDP_REQUEST_URI: &str = "http://localhost";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Clone)]
struct Tokens {
    id_token: String,
    refresh_token: String,
}

/// Identity adapter backed by Firebase Authentication.
pub struct FirebaseAuth {
    http: reqwest::Client,
    config: FirebaseConfig,
    publisher: SessionPublisher,
    tokens: Mutex<Option<Tokens>>,
    store: Option<SessionStore>,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: FirebaseConfig) -> Self {
        Self {
            http,
            config,
            publisher: SessionPublisher::new(),
            tokens: Mutex::new(None),
            store: None,
        }
    }

    /// Adapter for the app configuration, persisting sessions when a session file is set.
    pub fn from_config(config: &Config) -> Self {
        let auth = Self::new(config.firebase.clone());
        match &config.session_file {
            Some(path) => auth.with_store(SessionStore::new(path)),
            None => auth,
        }
    }

    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Current ID token, for calls that need to act as the user.
    pub fn id_token(&self) -> Option<String> {
        self.tokens.lock().as_ref().map(|t| t.id_token.clone())
    }

    /// Resolve the initial `Loading` state.
    ///
    /// Exchanges a persisted refresh token for a fresh session when one is
    /// stored; any failure discards the stored token and reports signed out.
    pub async fn restore(&self) {
        let Some(stored) = self.store.as_ref().and_then(SessionStore::load) else {
            tracing::info!("No stored session");
            self.publisher.signed_out();
            return;
        };

        match self.refresh(&stored.refresh_token).await {
            Ok(session) => {
                tracing::info!(uid = %session.uid, "Restored session");
                self.publisher.signed_in(session);
            }
            Err(e) => {
                tracing::warn!(code = e.code(), "Could not restore session: {}", e);
                self.forget_stored();
                self.publisher.signed_out();
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let url = format!(
            "{}/token?key={}",
            self.config.token_api_base, self.config.api_key
        );
        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        let tokens: TokenResponse = read_response(response).await?;

        let lookup: LookupResponse = self
            .post_json("lookup", &json!({ "idToken": tokens.id_token }))
            .await?;
        let user = lookup
            .users
            .into_iter()
            .find(|u| u.local_id == tokens.user_id)
            .ok_or(AuthError::UserNotFound)?;

        let session = Session {
            uid: user.local_id,
            email: user.email,
            display_name: user.display_name,
        };
        self.keep_tokens(
            &session,
            Tokens {
                id_token: tokens.id_token,
                refresh_token: tokens.refresh_token,
            },
        );
        Ok(session)
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.auth_api_base, method, self.config.api_key
        )
    }

    async fn post_json<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(method, "Identity Toolkit request");
        let response = self
            .http
            .post(self.accounts_url(method))
            .json(body)
            .send()
            .await?;
        read_response(response).await
    }

    /// Remember the tokens, persist the refresh token and publish the session.
    fn establish(&self, account: AccountResponse) -> Session {
        let session = Session {
            uid: account.local_id,
            email: account.email,
            display_name: account.display_name,
        };
        self.keep_tokens(
            &session,
            Tokens {
                id_token: account.id_token,
                refresh_token: account.refresh_token,
            },
        );
        self.publisher.signed_in(session.clone());
        session
    }

    fn keep_tokens(&self, session: &Session, tokens: Tokens) {
        if let Some(store) = &self.store {
            let stored = StoredSession {
                uid: session.uid.clone(),
                refresh_token: tokens.refresh_token.clone(),
            };
            if let Err(e) = store.save(&stored) {
                tracing::warn!(path = %store.path().display(), "Failed to persist session: {}", e);
            }
        }
        *self.tokens.lock() = Some(tokens);
    }

    fn forget_stored(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                tracing::warn!(path = %store.path().display(), "Failed to remove session file: {}", e);
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .post_json(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let session = self.establish(account);
        tracing::info!(uid = %session.uid, "Signed in with email");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account: AccountResponse = self
            .post_json(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        let session = self.establish(account);
        tracing::info!(uid = %session.uid, "Created account");
        Ok(session)
    }

    async fn sign_in_with_provider(
        &self,
        credential: FederatedCredential,
    ) -> Result<Session, AuthError> {
        let token = credential.token.trim();
        if token.is_empty() {
            return Err(AuthError::PopupClosedByUser);
        }

        let post_body = format!(
            "{}={}&providerId={}",
            credential.provider.token_param(),
            token,
            credential.provider.provider_id()
        );
        let account: AccountResponse = self
            .post_json(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": IDP_REQUEST_URI,
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
        let session = self.establish(account);
        tracing::info!(uid = %session.uid, provider = credential.provider.name(), "Signed in with provider");
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let _: serde_json::Value = self
            .post_json(
                "sendOobCode",
                &json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        tracing::info!("Password reset email requested");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.tokens.lock().take();
        self.forget_stored();
        self.publisher.signed_out();
        tracing::info!("Signed out");
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    async fn validate(&self) -> ValidationReport {
        validate_firebase(&self.http, &self.config).await
    }

    fn console_url(&self) -> String {
        self.config.providers_console_url()
    }
}

/// Decode a success body, or translate the REST error envelope into an `AuthError`.
async fn read_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, AuthError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => AuthError::from_rest_message(&envelope.error.message),
            Err(_) => AuthError::Other {
                code: "auth/internal-error".to_string(),
                message: format!("Identity request failed with status {}", status),
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| AuthError::Other {
        code: "auth/internal-error".to_string(),
        message: format!("Failed to parse response: {}", e),
    })
}
