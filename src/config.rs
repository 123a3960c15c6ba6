use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable prefix, e.g. `TRANSLATION_HUB__SERVICE__HTTP__PORT=9000`
const ENV_PREFIX: &str = "TRANSLATION_HUB";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub hub: HubConfig,
    pub translation: TranslationConfig,
    pub nats: NatsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "translation-hub".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Fanout tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Upper bound for a single subscriber send before the connection is dropped
    pub send_timeout_ms: u64,

    /// Outbound frames queued per WebSocket connection
    pub subscriber_buffer: usize,

    /// `source` stamped on relayed events that do not name one
    pub relay_source: String,
}

impl HubConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: 2000,
            subscriber_buffer: 64,
            relay_source: "relay".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,

    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4-1106-preview".to_string(),
            max_tokens: 300,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Optional NATS transcript source; disabled while `url` is unset
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    pub url: Option<String>,
    pub subject: String,

    /// Only accept transcripts for this session when set
    pub session_id: Option<String>,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: None,
            subject: "stt.text.>".to_string(),
            session_id: None,
        }
    }
}

impl Config {
    /// Load from an optional file (any format the `config` crate knows,
    /// extension may be omitted) layered under `TRANSLATION_HUB__*` env vars
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        if cfg.translation.api_key.is_none() {
            cfg.translation.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Ok(cfg)
    }
}
