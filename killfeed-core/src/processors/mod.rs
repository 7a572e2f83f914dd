//! Feed drivers and the shared per-kill pipeline.
//!
//! - `KillPipeline`: classifies, composes and delivers one killmail
//! - `KillstreamListener`: websocket driver, feeds pushed killmails into the pipeline
//! - `QueuePoller`: RedisQ driver, fetches each queued kill from ESI first

pub mod kill_pipeline;
pub mod queue_poller;
pub mod stream_listener;

pub use kill_pipeline::{IncomingKill, KillOutcome, KillPipeline};
pub use queue_poller::{
    ConnectionResetPolicy, FatalErrorPolicy, PollError, PollIntervals, PollStep, QueuePoller,
    QueueSource,
};
pub use stream_listener::{KillstreamListener, StreamState};
