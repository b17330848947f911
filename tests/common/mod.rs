//! Shared helpers for the integration tests.

#![allow(dead_code)]

pub mod mocks;

use mrbot::utils::config::FirebaseConfig;

/// Identity parameters pointing every REST call at `base`.
pub fn firebase_config(base: &str) -> FirebaseConfig {
    FirebaseConfig {
        api_key: "test-api-key".to_string(),
        auth_domain: "mrbot-test.firebaseapp.com".to_string(),
        project_id: "mrbot-test".to_string(),
        storage_bucket: "mrbot-test.appspot.com".to_string(),
        messaging_sender_id: "1234567890".to_string(),
        app_id: "1:1234567890:web:abcdef".to_string(),
        measurement_id: None,
        auth_api_base: format!("{}/v1", base),
        token_api_base: format!("{}/token-api", base),
    }
}
