use crate::utils::config::FirebaseConfig;

/// Outcome of a configuration check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the identity parameters and probe the auth domain.
///
/// The probe is best effort: any HTTP response, whatever its status, counts as
/// reachable. Only a transport failure is reported.
pub async fn validate_firebase(http: &reqwest::Client, config: &FirebaseConfig) -> ValidationReport {
    let mut errors = config.problems();

    let auth_domain = config.auth_domain.trim();
    if !auth_domain.is_empty() {
        let url = config.auth_config_probe_url();
        match http.head(&url).send().await {
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Auth domain reachable");
            }
            Err(e) => {
                tracing::warn!(auth_domain, "Auth domain probe failed: {}", e);
                errors.push(format!("Firebase auth domain not accessible: {}", auth_domain));
            }
        }
    }

    for error in &errors {
        tracing::error!("{}", error);
    }

    ValidationReport { errors }
}
