//! Configuration module

use std::env;

/// Default origins allowed to call /analyze (local frontend dev servers).
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Gemini API key; absence disables AI adjudication
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier
    pub gemini_model: String,

    /// UptimeRobot API key; absence disables the reputation lookup
    pub uptimerobot_api_key: Option<String>,

    /// Origins allowed to call /analyze cross-origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            gemini_api_key: non_empty(env::var("GEMINI_API_KEY").ok()),

            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),

            uptimerobot_api_key: non_empty(env::var("UPTIMEROBOT_API_KEY").ok()),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Check if AI adjudication is enabled
    pub fn ai_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// Check if the monitoring-service reputation lookup is enabled
    pub fn monitoring_enabled(&self) -> bool {
        self.uptimerobot_api_key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> Config {
        Config {
            port: 5000,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            uptimerobot_api_key: None,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }

    #[test]
    fn features_disabled_without_keys() {
        let config = bare_config();
        assert!(!config.ai_enabled());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn features_enabled_with_keys() {
        let mut config = bare_config();
        config.gemini_api_key = Some("key".to_string());
        config.uptimerobot_api_key = Some("key".to_string());
        assert!(config.ai_enabled());
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn blank_key_counts_as_absent() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("k".to_string())), Some("k".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
