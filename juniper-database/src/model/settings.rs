use serde::{Deserialize, Serialize};

pub const DEFAULT_ANTISPAM_MAX_MESSAGES: u32 = 7;
pub const DEFAULT_ANTISPAM_WINDOW_SECS: u64 = 5;
pub const DEFAULT_ANTISPAM_TIMEOUT_SECS: u64 = 10 * 60;
pub const DEFAULT_STARBOARD_THRESHOLD: u32 = 3;

/// Auto-mod sub-config. Both checks are off until an admin opts in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomodConfig {
    pub antispam_enabled: bool,
    pub antispam_max_messages: u32,
    pub antispam_window_seconds: u64,
    pub antispam_timeout_seconds: u64,
    pub antilink_enabled: bool,
}

impl Default for AutomodConfig {
    fn default() -> Self {
        Self {
            antispam_enabled: false,
            antispam_max_messages: DEFAULT_ANTISPAM_MAX_MESSAGES,
            antispam_window_seconds: DEFAULT_ANTISPAM_WINDOW_SECS,
            antispam_timeout_seconds: DEFAULT_ANTISPAM_TIMEOUT_SECS,
            antilink_enabled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarboardConfig {
    pub channel_id: Option<u64>,
    pub threshold: u32,
}

impl Default for StarboardConfig {
    fn default() -> Self {
        Self {
            channel_id: None,
            threshold: DEFAULT_STARBOARD_THRESHOLD,
        }
    }
}

/// Per-guild configuration aggregate. One row per guild, lazily
/// materialized: reads of an absent row yield these defaults, the row is
/// created by the first write. Command handlers and the dashboard API both
/// edit this same aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: u64,
    /// `None` falls back to the process-wide default prefix.
    pub prefix: Option<String>,
    pub welcome_channel_id: Option<u64>,
    pub welcome_template: Option<String>,
    pub log_channel_id: Option<u64>,
    pub mute_role_id: Option<u64>,
    pub automod: AutomodConfig,
    pub bot_autorole_id: Option<u64>,
    pub human_autorole_id: Option<u64>,
    pub starboard: StarboardConfig,
}

impl GuildSettings {
    pub fn defaults_for(guild_id: u64) -> Self {
        Self {
            guild_id,
            prefix: None,
            welcome_channel_id: None,
            welcome_template: None,
            log_channel_id: None,
            mute_role_id: None,
            automod: AutomodConfig::default(),
            bot_autorole_id: None,
            human_autorole_id: None,
            starboard: StarboardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let settings = GuildSettings::defaults_for(42);
        assert_eq!(settings.guild_id, 42);
        assert_eq!(settings.prefix, None);
        assert!(!settings.automod.antispam_enabled);
        assert_eq!(settings.automod.antispam_max_messages, 7);
        assert_eq!(settings.automod.antispam_window_seconds, 5);
        assert_eq!(settings.automod.antispam_timeout_seconds, 600);
        assert_eq!(settings.starboard.threshold, 3);
    }

    #[test]
    fn aggregate_survives_a_json_round_trip() {
        let mut settings = GuildSettings::defaults_for(42);
        settings.prefix = Some("?".to_owned());
        settings.automod.antilink_enabled = true;
        settings.starboard.channel_id = Some(77);

        let encoded = serde_json::to_string(&settings).expect("serialize");
        let decoded: GuildSettings = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, settings);
    }
}
