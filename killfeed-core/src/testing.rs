//! In-memory stand-ins for the network-facing traits.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use killfeed_sdk::client::ClientError;
use killfeed_sdk::objects::{
    Attacker, EntityKind, Killmail, RedisQPackage, RedisQResponse, SlackMessage, Victim, Zkb,
};
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::macros::datetime;

use crate::fetcher::KillmailSource;
use crate::processors::QueueSource;
use crate::reference::ReferenceSource;
use crate::sink::MessageSink;

/// Answers every lookup with `{"name": "<kind> <id>"}` unless told otherwise.
#[derive(Default)]
pub struct FakeReferenceSource {
    calls: Mutex<HashMap<(EntityKind, i64), usize>>,
    failing: Mutex<HashSet<(EntityKind, i64)>>,
    overrides: Mutex<HashMap<(EntityKind, i64), serde_json::Value>>,
}

impl FakeReferenceSource {
    pub fn fail(&self, kind: EntityKind, id: i64) {
        self.failing.lock().unwrap().insert((kind, id));
    }

    pub fn recover(&self, kind: EntityKind, id: i64) {
        self.failing.lock().unwrap().remove(&(kind, id));
    }

    pub fn respond_with(&self, kind: EntityKind, id: i64, body: serde_json::Value) {
        self.overrides.lock().unwrap().insert((kind, id), body);
    }

    pub fn calls(&self, kind: EntityKind, id: i64) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&(kind, id))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ReferenceSource for FakeReferenceSource {
    async fn fetch_reference(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<serde_json::Value, ClientError> {
        *self.calls.lock().unwrap().entry((kind, id)).or_default() += 1;

        if self.failing.lock().unwrap().contains(&(kind, id)) {
            return Err(api_error(404, "not found"));
        }
        if let Some(body) = self.overrides.lock().unwrap().get(&(kind, id)) {
            return Ok(body.clone());
        }
        Ok(serde_json::json!({ "name": format!("{kind} {id}") }))
    }
}

#[derive(Default)]
pub struct FakeKillmailSource {
    killmails: Mutex<HashMap<(i64, String), Killmail>>,
    calls: AtomicUsize,
}

impl FakeKillmailSource {
    pub fn insert(&self, killmail: Killmail, hash: &str) {
        self.killmails
            .lock()
            .unwrap()
            .insert((killmail.killmail_id, hash.to_string()), killmail);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KillmailSource for FakeKillmailSource {
    async fn fetch_killmail(&self, kill_id: i64, hash: &str) -> Result<Killmail, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.killmails
            .lock()
            .unwrap()
            .get(&(kill_id, hash.to_string()))
            .cloned()
            .ok_or_else(|| api_error(422, "invalid killmail_id and/or killmail_hash"))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<SlackMessage>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<SlackMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn deliver(&self, message: &SlackMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

/// Replays scripted responses, then reports an empty queue forever.
pub struct ScriptedQueue {
    script: Mutex<VecDeque<Result<RedisQResponse, ClientError>>>,
    calls: AtomicUsize,
}

impl ScriptedQueue {
    pub fn new(script: Vec<Result<RedisQResponse, ClientError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueSource for ScriptedQueue {
    async fn next_package(&self) -> Result<RedisQResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(RedisQResponse { package: None }))
    }
}

pub fn api_error(status: u16, body: &str) -> ClientError {
    ClientError::Api {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
    }
}

pub fn connection_reset() -> ClientError {
    ClientError::WebSocket(tokio_tungstenite::tungstenite::Error::Io(
        std::io::Error::from(std::io::ErrorKind::ConnectionReset),
    ))
}

pub fn queued(kill_id: i64, hash: &str, total_value: &str) -> RedisQResponse {
    RedisQResponse {
        package: Some(RedisQPackage {
            kill_id,
            zkb: Zkb {
                hash: hash.to_string(),
                total_value: total_value.parse().ok(),
                ..Default::default()
            },
        }),
    }
}

/// An attacker whose character ID is `9000 + damage_done`.
pub fn attacker(damage_done: i64, ship_type_id: Option<i64>, final_blow: bool) -> Attacker {
    Attacker {
        character_id: Some(9000 + damage_done),
        corporation_id: Some(4000),
        ship_type_id,
        damage_done,
        final_blow,
        ..Default::default()
    }
}

/// Victim character 3000 of corporation 2000 in ship 587 at Jita,
/// killed solo by attacker corporation 4000.
pub fn sample_killmail(killmail_id: i64) -> Killmail {
    Killmail {
        killmail_id,
        killmail_time: datetime!(2024-03-07 05:09:59 UTC),
        solar_system_id: 30000142,
        victim: Victim {
            character_id: Some(3000),
            corporation_id: 2000,
            alliance_id: None,
            ship_type_id: 587,
            damage_taken: 100,
        },
        attackers: vec![attacker(100, Some(11), true)],
        zkb: None,
    }
}
