//! RedisQ client (notifier → zKillboard long-poll queue).
//!
//! Every queue ID gets its own cursor on the server side, so two
//! notifiers sharing an ID split the kills between them.

use reqwest::Client;
use url::Url;

use super::{ClientError, as_directory, parse_response};
use crate::objects::RedisQResponse;

/// Typed HTTP client for the RedisQ `listen.php` endpoint.
#[derive(Debug, Clone)]
pub struct RedisQClient {
    http: Client,
    base_url: Url,
    queue_id: String,
}

impl RedisQClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://zkillredisq.stream/";

    /// Create a new `RedisQClient`.
    ///
    /// No overall request timeout is set: the server holds the request
    /// open until a kill arrives or its own wait expires.
    pub fn new(
        base_url: Url,
        queue_id: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: as_directory(base_url),
            queue_id: queue_id.into(),
        })
    }

    /// `GET /listen.php?queueID={id}` – wait for the next kill reference.
    pub async fn listen(&self) -> Result<RedisQResponse, ClientError> {
        let url = self.base_url.join("listen.php")?;

        let resp = self
            .http
            .get(url)
            .query(&[("queueID", self.queue_id.as_str())])
            .send()
            .await?;

        parse_response(resp).await
    }
}
