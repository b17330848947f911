/// Environment-backed configuration.
pub mod config;

pub use config::{Config, ConfigError, FirebaseConfig, GeminiConfig};
