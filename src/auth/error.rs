//! Identity provider errors
//!
//! The provider reports failures as vendor strings (`EMAIL_NOT_FOUND`,
//! `auth/wrong-password`, ...). They are folded into [`AuthError`] at the
//! adapter boundary so the views only ever match on variants. `Display` is the
//! user-facing message shown in notifications.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("No account found with this email address.")]
    UserNotFound,

    #[error("Incorrect password. Please try again.")]
    WrongPassword,

    #[error("An account with this email already exists.")]
    EmailAlreadyInUse,

    #[error("Password should be at least 6 characters long.")]
    WeakPassword,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Too many failed attempts. Please try again later.")]
    TooManyRequests,

    #[error("Sign-in was cancelled.")]
    PopupClosedByUser,

    #[error("Network error. Please check your connection.")]
    NetworkRequestFailed,

    #[error("Invalid Firebase API key. Please check your configuration.")]
    InvalidApiKey,

    #[error("Firebase project has been deleted. Please check your configuration.")]
    AppDeleted,

    #[error("App not authorized to use Firebase Authentication. Check your Firebase console.")]
    AppNotAuthorized,

    #[error("Browser storage is not supported or disabled.")]
    WebStorageUnsupported,

    #[error("This authentication method is not enabled. Please enable it in Firebase console.")]
    OperationNotAllowed,

    #[error("This account has been disabled.")]
    UserDisabled,

    #[error("Invalid email or password.")]
    InvalidCredential,

    /// Any code without a dedicated message.
    #[error("Authentication Error ({code}): {message}")]
    Other { code: String, message: String },
}

impl AuthError {
    /// Canonical `auth/...` code for this error.
    pub fn code(&self) -> &str {
        match self {
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::TooManyRequests => "auth/too-many-requests",
            AuthError::PopupClosedByUser => "auth/popup-closed-by-user",
            AuthError::NetworkRequestFailed => "auth/network-request-failed",
            AuthError::InvalidApiKey => "auth/invalid-api-key",
            AuthError::AppDeleted => "auth/app-deleted",
            AuthError::AppNotAuthorized => "auth/app-not-authorized",
            AuthError::WebStorageUnsupported => "auth/web-storage-unsupported",
            AuthError::OperationNotAllowed => "auth/operation-not-allowed",
            AuthError::UserDisabled => "auth/user-disabled",
            AuthError::InvalidCredential => "auth/invalid-credential",
            AuthError::Other { code, .. } => code,
        }
    }

    /// Build from a canonical `auth/...` code and the provider's message.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "auth/user-not-found" => AuthError::UserNotFound,
            "auth/wrong-password" => AuthError::WrongPassword,
            "auth/email-already-in-use" => AuthError::EmailAlreadyInUse,
            "auth/weak-password" => AuthError::WeakPassword,
            "auth/invalid-email" => AuthError::InvalidEmail,
            "auth/too-many-requests" => AuthError::TooManyRequests,
            "auth/popup-closed-by-user" => AuthError::PopupClosedByUser,
            "auth/network-request-failed" => AuthError::NetworkRequestFailed,
            "auth/invalid-api-key" => AuthError::InvalidApiKey,
            "auth/app-deleted" => AuthError::AppDeleted,
            "auth/app-not-authorized" => AuthError::AppNotAuthorized,
            "auth/web-storage-unsupported" => AuthError::WebStorageUnsupported,
            "auth/operation-not-allowed" => AuthError::OperationNotAllowed,
            "auth/user-disabled" => AuthError::UserDisabled,
            "auth/invalid-credential" => AuthError::InvalidCredential,
            other => AuthError::Other {
                code: other.to_string(),
                message: message.to_string(),
            },
        }
    }

    /// Build from the `error.message` field of an Identity Toolkit REST response.
    ///
    /// REST messages look like `EMAIL_NOT_FOUND` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub fn from_rest_message(message: &str) -> Self {
        if message.starts_with("API key not valid") {
            return AuthError::InvalidApiKey;
        }

        let reason = message
            .split(" : ")
            .next()
            .unwrap_or(message)
            .trim();

        match reason {
            "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
            "INVALID_PASSWORD" => AuthError::WrongPassword,
            "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthError::WeakPassword,
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyRequests,
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => {
                AuthError::OperationNotAllowed
            }
            "USER_DISABLED" => AuthError::UserDisabled,
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_IDP_RESPONSE" => AuthError::InvalidCredential,
            "INVALID_API_KEY" => AuthError::InvalidApiKey,
            "PROJECT_NOT_FOUND" | "CONFIGURATION_NOT_FOUND" => AuthError::AppDeleted,
            "UNAUTHORIZED_DOMAIN" => AuthError::AppNotAuthorized,
            other => AuthError::Other {
                code: format!("auth/{}", other.to_lowercase().replace('_', "-")),
                message: message.to_string(),
            },
        }
    }

    /// The two configuration failures that get a follow-up console link.
    pub fn needs_console_hint(&self) -> bool {
        matches!(self, AuthError::InvalidApiKey | AuthError::AppNotAuthorized)
    }

    /// Message shown to the user, identical to `Display`.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(_: reqwest::Error) -> Self {
        AuthError::NetworkRequestFailed
    }
}
