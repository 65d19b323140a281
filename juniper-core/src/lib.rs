/// AFK markers kept in process memory.
pub mod afk;
/// Per-command, per-user cooldown bookkeeping.
pub mod cooldown;
/// In-memory giveaway registry with idempotent conclusion.
pub mod giveaway;
/// Fixed-window counters for anti-spam and anti-raid checks.
pub mod ratewindow;

use juniper_database::Database;

use crate::afk::AfkRegistry;
use crate::cooldown::CooldownTracker;
use crate::giveaway::GiveawayRegistry;
use crate::ratewindow::{JoinRateTracker, MessageRateTracker};

pub type Error = anyhow::Error;

/// Process-wide state handed to every command and event handler.
///
/// Only `db` is durable. The service objects are owned by this single
/// process and reset on restart; nothing in them survives a redeploy.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub default_prefix: String,
    pub cooldowns: CooldownTracker,
    pub giveaways: GiveawayRegistry,
    pub message_rate: MessageRateTracker,
    pub join_rate: JoinRateTracker,
    pub afk: AfkRegistry,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
