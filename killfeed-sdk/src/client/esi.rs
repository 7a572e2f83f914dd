//! ESI client (notifier → EVE reference data and killmail bodies).
//!
//! ESI is public for every endpoint used here; the only requirement is a
//! descriptive `User-Agent` carrying contact details, which the client
//! attaches to every request.

use reqwest::Client;
use url::Url;

use super::{ClientError, as_directory, parse_response};
use crate::objects::{EntityKind, Killmail};

/// Typed HTTP client for the public ESI endpoints.
#[derive(Debug, Clone)]
pub struct EsiClient {
    http: Client,
    base_url: Url,
}

impl EsiClient {
    /// Versioned ESI root used in production.
    pub const DEFAULT_BASE_URL: &'static str = "https://esi.evetech.net/latest/";

    /// Create a new `EsiClient`.
    ///
    /// * `base_url` – versioned ESI root (see [`Self::DEFAULT_BASE_URL`]).
    /// * `user_agent` – sent as `User-Agent` on every request.
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: as_directory(base_url),
        })
    }

    /// `GET /{kind}/{id}/` – raw JSON of one reference record.
    ///
    /// Decoding is left to the caller so a malformed record can be told
    /// apart from a transport failure.
    pub async fn get_reference(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.base_url.join(&kind.path(id))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /killmails/{killmail_id}/{killmail_hash}/` – full killmail body.
    pub async fn get_killmail(&self, killmail_id: i64, hash: &str) -> Result<Killmail, ClientError> {
        let url = self
            .base_url
            .join(&format!("killmails/{killmail_id}/{hash}/"))?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}
