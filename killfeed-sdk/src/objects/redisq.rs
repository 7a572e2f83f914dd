//! RedisQ long-poll envelope.
//!
//! `GET /listen.php?queueID={id}` blocks until a kill is available or the
//! server-side wait expires, then answers with one of:
//!
//! ```json
//! {"package": {"killID": 118390417, "zkb": {"hash": "...", "totalValue": 1.0}}}
//! {"package": null}
//! ```

use serde::{Deserialize, Serialize};

use super::killmail::Zkb;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedisQResponse {
    #[serde(default)]
    pub package: Option<RedisQPackage>,
}

/// A reference to one killmail; the body itself is fetched from ESI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisQPackage {
    #[serde(rename = "killID")]
    pub kill_id: i64,
    #[serde(default)]
    pub zkb: Zkb,
}
