use std::time::Duration;

use anyhow::{Context, Result};

use crate::viewer::Endpoints;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin prepended to `/api/enhanced_citations/...`; empty keeps URLs relative.
    pub api_base: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        let defaults = Self::default();

        let api_base = dotenv::var("CITATION_API_BASE").unwrap_or(defaults.api_base);
        let http_timeout = match dotenv::var("CITATION_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("Invalid CITATION_HTTP_TIMEOUT_SECS: {:?}", raw))?,
            ),
            Err(_) => defaults.http_timeout,
        };

        Ok(Self {
            api_base,
            http_timeout,
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_base)
    }
}
