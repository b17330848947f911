use std::env;
use std::path::{Path, PathBuf};

/// Keys that must be present and non-empty before the app renders anything
/// but the configuration error screen.
pub const REQUIRED_KEYS: [&str; 7] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
    "GEMINI_API_KEY",
];

/// The subset of keys the identity adapter re-checks before sign-in.
pub const IDENTITY_KEYS: [&str; 4] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_APP_ID",
];

/// Prefix accepted as a fallback so `.env` files written for the web build keep working.
const LEGACY_PREFIX: &str = "VITE_";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_AUTH_API_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOKEN_API_BASE: &str = "https://securetoken.googleapis.com/v1";
const CONSOLE_BASE: &str = "https://console.firebase.google.com/project";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Failed to load env file {path}: {message}")]
    EnvFile { path: String, message: String },
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    pub measurement_id: Option<String>,
    pub auth_api_base: String,
    pub token_api_base: String,
}

impl FirebaseConfig {
    /// Read the identity parameters without requiring any of them.
    ///
    /// Absent keys become empty strings; [`FirebaseConfig::problems`] reports them.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| resolve(&lookup, key);
        let value = |key: &str| get(key).unwrap_or_default();

        FirebaseConfig {
            api_key: value("FIREBASE_API_KEY"),
            auth_domain: value("FIREBASE_AUTH_DOMAIN"),
            project_id: value("FIREBASE_PROJECT_ID"),
            storage_bucket: value("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: value("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: value("FIREBASE_APP_ID"),
            measurement_id: get("FIREBASE_MEASUREMENT_ID"),
            auth_api_base: get("FIREBASE_AUTH_API_BASE")
                .unwrap_or_else(|| DEFAULT_AUTH_API_BASE.to_string()),
            token_api_base: get("FIREBASE_TOKEN_API_BASE")
                .unwrap_or_else(|| DEFAULT_TOKEN_API_BASE.to_string()),
        }
    }

    /// Same as [`FirebaseConfig::from_source`] over the process environment.
    pub fn from_env() -> Self {
        Self::from_source(process_env)
    }

    /// Human-readable problems with the identity parameters, empty when complete.
    pub fn problems(&self) -> Vec<String> {
        [
            ("FIREBASE_API_KEY", &self.api_key),
            ("FIREBASE_AUTH_DOMAIN", &self.auth_domain),
            ("FIREBASE_PROJECT_ID", &self.project_id),
            ("FIREBASE_APP_ID", &self.app_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| format!("Missing environment variable: {}", key))
        .collect()
    }

    /// Console page where sign-in methods are enabled.
    pub fn providers_console_url(&self) -> String {
        format!(
            "{}/{}/authentication/providers",
            CONSOLE_BASE, self.project_id
        )
    }

    /// Console page where authorized domains are managed.
    pub fn settings_console_url(&self) -> String {
        format!("{}/{}/authentication/settings", CONSOLE_BASE, self.project_id)
    }

    /// Endpoint probed to check the auth domain is reachable.
    pub fn auth_config_probe_url(&self) -> String {
        format!(
            "https://{}/__/auth/config?appId={}",
            self.auth_domain, self.app_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub firebase: FirebaseConfig,
    pub gemini: GeminiConfig,
    /// Where the refresh token is persisted between runs; `None` keeps sessions in memory only.
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Load the env file (see [`load_env`]) and read the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        load_env(env_file)?;
        Self::from_env()
    }

    /// Read the process environment as it is.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(process_env)
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Every required key is checked before failing, so the error lists all
    /// of the missing keys at once.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| resolve(&lookup, key);

        let missing = missing_keys(&lookup);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let required = |key: &'static str| get(key).unwrap_or_default();

        Ok(Config {
            firebase: FirebaseConfig::from_source(&lookup),
            gemini: GeminiConfig {
                api_key: required("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: get("GEMINI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            },
            session_file: get("MRBOT_SESSION_FILE").map(PathBuf::from),
        })
    }
}

/// Load variables from `path`, or from `./.env` when no path is given.
///
/// A missing default `.env` is not an error; an explicit path must exist.
/// Variables already set in the process win over the file.
pub fn load_env(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::debug!(path = %path.display(), "Loaded env file");
        }
        None => {
            if let Ok(path) = dotenvy::dotenv() {
                tracing::debug!(path = %path.display(), "Loaded .env");
            }
        }
    }
    Ok(())
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Required keys that are absent or empty in `lookup`, in declaration order.
pub fn missing_keys<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_KEYS
        .into_iter()
        .filter(|key| resolve(&lookup, key).is_none())
        .collect()
}

fn resolve<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .or_else(|| lookup(&format!("{}{}", LEGACY_PREFIX, key)))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
