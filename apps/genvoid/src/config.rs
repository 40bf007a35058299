use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_IMAGEN_MODEL: &str = "imagen-3.0-generate-002";
const DEFAULT_IMAGEN_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub imagen_model: String,
    pub imagen_api_base: String,
    pub port: u16,
    pub rust_log: String,
    /// Sessions not touched for this long are evicted along with their timers.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            imagen_model: std::env::var("IMAGEN_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGEN_MODEL.to_string()),
            imagen_api_base: std::env::var("IMAGEN_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_IMAGEN_API_BASE.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_ttl: std::env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
                .parse::<u64>()
                .map(Duration::from_secs)
                .context("SESSION_TTL_SECS must be a whole number of seconds")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            imagen_model: "imagen-test".to_string(),
            imagen_api_base: "http://localhost:0".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
