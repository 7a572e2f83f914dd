//! TOML file configuration structures.
//!
//! These structs directly map to the `killfeed.toml` file format.

use killfeed_sdk::client::{EsiClient, KillstreamClient, RedisQClient};
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    /// Corporation and alliance IDs to report on. Empty means every kill.
    #[serde(default)]
    pub watched_ids: Vec<i64>,
    /// Slack incoming webhook. Without it messages are only logged.
    #[serde(default)]
    pub slack_webhook_url: Option<String>,
    /// Sent with every ESI and RedisQ request; must carry a contact email.
    pub user_agent: String,
    /// RedisQ queue identifier. Generated when absent.
    #[serde(default)]
    pub queue_id: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the `/health` endpoint listens on.
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// External service base URLs. Overridden for staging and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_esi")]
    pub esi: String,
    #[serde(default = "default_redisq")]
    pub redisq: String,
    #[serde(default = "default_killstream")]
    pub killstream: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            esi: default_esi(),
            redisq: default_redisq(),
            killstream: default_killstream(),
        }
    }
}

fn default_esi() -> String {
    EsiClient::DEFAULT_BASE_URL.to_string()
}

fn default_redisq() -> String {
    RedisQClient::DEFAULT_BASE_URL.to_string()
}

fn default_killstream() -> String {
    KillstreamClient::DEFAULT_URL.to_string()
}
