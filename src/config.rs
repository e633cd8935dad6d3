// src/config.rs
use std::env;
use std::time::Duration;

use anyhow::Context;
use serde_json::{Map, Value};

/// Runtime configuration, read once from the process environment at startup.
///
/// Recognized variables:
/// - `LANGFLOW_BASE_URL`   base URL of the flow service (default `http://localhost:7860`)
/// - `LANGFLOW_FLOW_ID`    endpoint identifier of the flow (default `customer-support-agent`)
/// - `LANGFLOW_API_KEY`    optional credential, sent as `x-api-key`
/// - `LANGFLOW_TWEAKS`     JSON object passed through to the flow (default `{}`)
/// - `BIND_ADDR`           listen address (default `0.0.0.0:3000`)
/// - `SESSION_TTL_SECS`    idle session lifetime (default `1800`)
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub flow_id: String,
    pub api_key: Option<String>,
    pub tweaks: Map<String, Value>,
    pub bind_addr: String,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("LANGFLOW_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:7860".to_string())
            .trim_end_matches('/')
            .to_string();

        let flow_id = env::var("LANGFLOW_FLOW_ID")
            .unwrap_or_else(|_| "customer-support-agent".to_string());

        let api_key = env::var("LANGFLOW_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let tweaks = match env::var("LANGFLOW_TWEAKS") {
            Ok(raw) => parse_tweaks(&raw).context("LANGFLOW_TWEAKS is not a JSON object")?,
            Err(_) => Map::new(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_ttl = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().context("SESSION_TTL_SECS is not a number")?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(1800),
        };

        Ok(Self {
            base_url,
            flow_id,
            api_key,
            tweaks,
            bind_addr,
            session_ttl,
        })
    }
}

fn parse_tweaks(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a JSON object, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweaks_must_be_an_object() {
        assert!(parse_tweaks(r#"{"ChatInput-abc123": {}}"#).is_ok());
        assert!(parse_tweaks("[]").is_err());
        assert!(parse_tweaks("not json").is_err());
    }
}
