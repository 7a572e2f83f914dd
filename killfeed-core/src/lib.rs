#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod composer;
pub mod fetcher;
pub mod health;
pub mod processors;
pub mod reference;
pub mod relevance;
pub mod sink;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
