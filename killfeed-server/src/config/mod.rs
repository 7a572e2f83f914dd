//! Configuration module for killfeed-server.
//!
//! Handles loading configuration from the TOML file and CLI overrides,
//! then validates everything up front so the process never starts with a
//! half-usable setup.

pub mod file;

use crate::config::file::FileConfig;
use killfeed_sdk::client::SlackClient;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

const USER_AGENT_PATTERN: &str = r"^.+\(.+@.+\)$";
const MIN_USER_AGENT_LEN: usize = 5;
const QUEUE_ID_PREFIX: &str = "killfeed-";
const QUEUE_ID_SUFFIX_LEN: usize = 10;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    ValidationError(Vec<String>),
}

/// Validated configuration ready to build clients from.
#[derive(Debug, Clone)]
pub struct Config {
    pub watched_ids: Vec<i64>,
    pub slack_webhook_url: Option<Url>,
    pub user_agent: String,
    pub queue_id: String,
    pub listen: SocketAddr,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub esi: Url,
    pub redisq: Url,
    pub killstream: Url,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, override and validate the configuration.
    ///
    /// `require_watch_list` rejects an empty `watched_ids`; the kill stream
    /// would otherwise report every kill in the game.
    pub fn load(&self, require_watch_list: bool) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&content, require_watch_list)
    }

    fn load_str(&self, content: &str, require_watch_list: bool) -> Result<Config, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(file_config, require_watch_list)
    }
}

/// Check every field and collect all problems before failing.
fn validate(config: FileConfig, require_watch_list: bool) -> Result<Config, ConfigError> {
    let mut problems = Vec::new();

    if require_watch_list && config.watched_ids.is_empty() {
        problems.push("watched_ids: must not be empty in stream mode".to_string());
    }

    let slack_webhook_url = config
        .slack_webhook_url
        .as_deref()
        .and_then(|raw| match Url::parse(raw) {
            Ok(_) if !raw.starts_with(SlackClient::WEBHOOK_PREFIX) => {
                problems.push(format!(
                    "slack_webhook_url: must start with {}",
                    SlackClient::WEBHOOK_PREFIX
                ));
                None
            }
            Ok(url) => Some(url),
            Err(e) => {
                problems.push(format!("slack_webhook_url: not a valid URL ({e})"));
                None
            }
        });

    if config.user_agent.chars().count() < MIN_USER_AGENT_LEN {
        problems.push(format!(
            "user_agent: must be at least {MIN_USER_AGENT_LEN} characters"
        ));
    }
    match Regex::new(USER_AGENT_PATTERN) {
        Ok(pattern) if !pattern.is_match(&config.user_agent) => problems.push(
            "user_agent: must include a contact email in parentheses, e.g. \"killfeed (ops@example.com)\""
                .to_string(),
        ),
        Ok(_) => {}
        Err(e) => problems.push(format!("user_agent: pattern failed to compile ({e})")),
    }

    let queue_id = match config.queue_id {
        Some(id) if id.trim().is_empty() => {
            problems.push("queue_id: must not be empty".to_string());
            String::new()
        }
        Some(id) => id,
        None => generate_queue_id(),
    };

    let mut endpoint = |name: &str, raw: &str| match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            problems.push(format!("endpoints.{name}: not a valid URL ({e})"));
            None
        }
    };
    let esi = endpoint("esi", &config.endpoints.esi);
    let redisq = endpoint("redisq", &config.endpoints.redisq);
    let killstream = endpoint("killstream", &config.endpoints.killstream);

    match (esi, redisq, killstream) {
        (Some(esi), Some(redisq), Some(killstream)) if problems.is_empty() => Ok(Config {
            watched_ids: config.watched_ids,
            slack_webhook_url,
            user_agent: config.user_agent,
            queue_id,
            listen: config.server.listen,
            endpoints: Endpoints {
                esi,
                redisq,
                killstream,
            },
        }),
        _ => Err(ConfigError::ValidationError(problems)),
    }
}

fn generate_queue_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(QUEUE_ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{QUEUE_ID_PREFIX}{suffix}")
}
