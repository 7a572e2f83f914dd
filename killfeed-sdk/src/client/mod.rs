//! HTTP and websocket clients for every external service.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest` or `tokio-tungstenite`.

mod esi;
mod killstream;
mod redisq;
mod slack;

pub use esi::EsiClient;
pub use killstream::{KillstreamClient, KillstreamConnection};
pub use redisq::RedisQClient;
pub use slack::SlackClient;

use reqwest::StatusCode;
use url::Url;

/// Errors produced by the SDK clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Websocket handshake, read or write failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

/// Make sure `base` ends with a slash so relative joins append to its path
/// instead of replacing the last segment.
fn as_directory(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_directory_appends_slash() {
        let base = as_directory(Url::parse("https://esi.evetech.net/latest").unwrap());
        assert_eq!(
            base.join("characters/1/").unwrap().as_str(),
            "https://esi.evetech.net/latest/characters/1/"
        );
    }

    #[test]
    fn test_as_directory_keeps_existing_slash() {
        let base = as_directory(Url::parse("http://127.0.0.1:1234").unwrap());
        assert_eq!(base.as_str(), "http://127.0.0.1:1234/");
    }
}
