//! Service configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default HTTP (REST) port. The WebSocket surface runs on its own port.
const DEFAULT_HTTP_PORT: u16 = 3001;

/// Default WebSocket port, advertised by the status endpoints.
const DEFAULT_WS_PORT: u16 = 3000;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind address for both surfaces (default: 127.0.0.1).
    pub bind: String,
    /// Port for the REST API.
    pub http_port: u16,
    /// Port for the WebSocket channel.
    pub ws_port: u16,
    /// Upstream completion provider settings.
    pub provider: ProviderConfig,
    /// Response cache settings.
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            http_port: DEFAULT_HTTP_PORT,
            ws_port: DEFAULT_WS_PORT,
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Groq API key. Falls back to `GROQ_API_KEY` when empty.
    pub api_key: String,
    /// Model identifier passed to the completion endpoint.
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: crate::providers::DEFAULT_GROQ_MODEL.to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached responses before FIFO eviction kicks in.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: crate::cache::DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Load defaults with environment overrides applied.
    ///
    /// Invalid numeric overrides are logged and ignored rather than
    /// aborting startup.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("REALTUTOR_BIND") {
            cfg.bind = v;
        }
        if let Ok(v) = std::env::var("REALTUTOR_HTTP_PORT") {
            match v.parse() {
                Ok(p) => cfg.http_port = p,
                Err(e) => warn!("ignoring invalid REALTUTOR_HTTP_PORT: {e}"),
            }
        }
        if let Ok(v) = std::env::var("REALTUTOR_WS_PORT") {
            match v.parse() {
                Ok(p) => cfg.ws_port = p,
                Err(e) => warn!("ignoring invalid REALTUTOR_WS_PORT: {e}"),
            }
        }
        if let Ok(v) = std::env::var("REALTUTOR_MODEL") {
            if !v.is_empty() {
                cfg.provider.model = v;
            }
        }
        if let Ok(v) = std::env::var("GROQ_API_KEY") {
            if cfg.provider.api_key.is_empty() {
                cfg.provider.api_key = v;
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.http_port, 3001);
        assert_eq!(cfg.ws_port, 3000);
        assert_eq!(cfg.provider.model, "deepseek-r1-distill-llama-70b");
        assert!(cfg.provider.api_key.is_empty());
        assert_eq!(cfg.cache.capacity, 50);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let json = r#"{"http_port": 8080, "provider": {"model": "llama-3.3-70b"}}"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.ws_port, 3000); // default
        assert_eq!(cfg.provider.model, "llama-3.3-70b");
        assert_eq!(cfg.cache.capacity, 50); // default
    }
}
