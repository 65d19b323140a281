use std::time::{SystemTime, UNIX_EPOCH};

pub mod cases;
pub mod disabled_commands;
pub mod guild_settings;
pub mod reaction_roles;
pub mod starboard;
pub mod tags;

pub(crate) fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}
