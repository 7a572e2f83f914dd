//! Wire types and clients for the services a killfeed notifier talks to.
//!
//! - [`objects`] holds the `serde` shapes of every external payload:
//!   killmails and their zKillboard sidecar, the RedisQ envelope, ESI
//!   reference records, the kill stream control frame and the Slack
//!   webhook body.
//! - [`client`] (behind the `client` feature) holds the typed HTTP and
//!   websocket clients.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
