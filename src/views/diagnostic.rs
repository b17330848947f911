//! Identity configuration report
//!
//! Shown when sign-in is impossible because of configuration. Checks that the
//! identity keys are set, runs the same validation the sign-in form runs, and
//! lists the console pages and settings that usually fix the problem.

use crate::auth::validator::{validate_firebase, ValidationReport};
use crate::utils::config::{FirebaseConfig, IDENTITY_KEYS};
use crate::views::Exit;
use parking_lot::Mutex;

pub const TITLE: &str = "Firebase Diagnostic Report";
pub const NOT_SET: &str = "Not set";

/// Sign-in methods the console must have enabled.
pub const SIGN_IN_METHODS: [&str; 3] = ["Email/Password", "Google (optional)", "GitHub (optional)"];

/// Domains to add to the console's authorized domain list.
pub const AUTHORIZED_DOMAINS: [&str; 2] = ["localhost", "127.0.0.1"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCheck {
    pub key: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub env: Vec<EnvCheck>,
    pub validation: ValidationReport,
    pub project_id: Option<String>,
    pub auth_domain: Option<String>,
    pub providers_url: String,
    pub settings_url: String,
}

impl DiagnosticReport {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_valid() {
            "Valid"
        } else {
            "Invalid"
        }
    }

    pub fn project_id_label(&self) -> &str {
        self.project_id.as_deref().unwrap_or(NOT_SET)
    }

    pub fn auth_domain_label(&self) -> &str {
        self.auth_domain.as_deref().unwrap_or(NOT_SET)
    }
}

pub struct DiagnosticReporter {
    http: reqwest::Client,
    config: FirebaseConfig,
    last: Mutex<Option<DiagnosticReport>>,
}

impl DiagnosticReporter {
    pub fn new(config: FirebaseConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: FirebaseConfig) -> Self {
        Self {
            http,
            config,
            last: Mutex::new(None),
        }
    }

    /// Run every check once. Calling again re-runs them from scratch.
    pub async fn run(&self) -> DiagnosticReport {
        tracing::info!("Running Firebase diagnostics");

        let env = IDENTITY_KEYS
            .into_iter()
            .zip([
                &self.config.api_key,
                &self.config.auth_domain,
                &self.config.project_id,
                &self.config.app_id,
            ])
            .map(|(key, value)| EnvCheck {
                key,
                present: !value.trim().is_empty(),
            })
            .collect();

        let validation = validate_firebase(&self.http, &self.config).await;
        let non_empty = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());

        let report = DiagnosticReport {
            env,
            validation,
            project_id: non_empty(&self.config.project_id),
            auth_domain: non_empty(&self.config.auth_domain),
            providers_url: self.config.providers_console_url(),
            settings_url: self.config.settings_console_url(),
        };

        *self.last.lock() = Some(report.clone());
        report
    }

    /// The most recent report, if `run` has completed.
    pub fn last_report(&self) -> Option<DiagnosticReport> {
        self.last.lock().clone()
    }

    /// Closing the report restarts the app with fresh state.
    pub fn close(self) -> Exit {
        Exit::Reload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reporter(env: &[(&str, &str)]) -> DiagnosticReporter {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DiagnosticReporter::new(FirebaseConfig::from_source(|key| env.get(key).cloned()))
    }

    #[tokio::test]
    async fn test_empty_configuration_report() {
        let reporter = reporter(&[]);
        let report = reporter.run().await;

        assert_eq!(report.env.len(), 4);
        assert!(report.env.iter().all(|check| !check.present));
        assert_eq!(report.status_label(), "Invalid");
        assert_eq!(report.project_id_label(), "Not set");
        assert_eq!(report.auth_domain_label(), "Not set");
        assert_eq!(report.validation.errors.len(), 4);
        assert_eq!(reporter.last_report(), Some(report));
    }

    #[tokio::test]
    async fn test_partial_configuration_report() {
        let report = reporter(&[
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "mrbot-demo"),
        ])
        .run()
        .await;

        let present: Vec<_> = report
            .env
            .iter()
            .filter(|check| check.present)
            .map(|check| check.key)
            .collect();
        assert_eq!(present, vec!["FIREBASE_API_KEY", "FIREBASE_PROJECT_ID"]);
        assert_eq!(report.project_id_label(), "mrbot-demo");
        assert_eq!(
            report.providers_url,
            "https://console.firebase.google.com/project/mrbot-demo/authentication/providers"
        );
        assert!(report.settings_url.ends_with("/authentication/settings"));
    }

    #[test]
    fn test_close_requests_reload() {
        assert_eq!(reporter(&[]).close(), Exit::Reload);
    }
}
