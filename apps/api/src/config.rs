use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Fails at startup only on malformed values; the API key is not checked here.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Whole-request timeout for provider calls. `None` keeps the HTTP client default.
    pub llm_timeout: Option<Duration>,
    /// The single origin allowed to make cross-origin requests.
    pub frontend_origin: HeaderValue,
    pub host: IpAddr,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_timeout = lookup("LLM_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().with_context(|| {
                    format!("LLM_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
                })
            })
            .transpose()?
            .map(Duration::from_secs);

        let frontend_origin = lookup("FRONTEND_ORIGIN")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());
        let frontend_origin = HeaderValue::from_str(&frontend_origin)
            .with_context(|| format!("FRONTEND_ORIGIN '{frontend_origin}' is not a valid origin"))?;

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            llm_timeout,
            frontend_origin,
            host: lookup("HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .parse::<IpAddr>()
                .context("HOST must be a valid IP address")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
