pub mod esi;
pub mod killmail;
pub mod killstream;
pub mod redisq;
pub mod slack;

pub use esi::{Alliance, Character, Corporation, EntityKind, ReferenceRecord, ShipType, SolarSystem};
pub use killmail::{Attacker, Killmail, Victim, Zkb};
pub use killstream::{KILLSTREAM_CHANNEL, KillstreamAction, KillstreamCommand};
pub use redisq::{RedisQPackage, RedisQResponse};
pub use slack::{Accessory, Attachment, Block, SlackMessage, Text};
