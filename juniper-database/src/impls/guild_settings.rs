use anyhow::Context as _;

use crate::{
    cache::{CONFIG_CACHE_TTL, guild_settings_key, invalidate_guild_settings},
    database::Database,
    model::settings::{AutomodConfig, GuildSettings, StarboardConfig},
};

#[derive(sqlx::FromRow)]
struct GuildSettingsRow {
    guild_id: i64,
    prefix: Option<String>,
    welcome_channel_id: Option<i64>,
    welcome_template: Option<String>,
    log_channel_id: Option<i64>,
    mute_role_id: Option<i64>,
    antispam_enabled: bool,
    antispam_max_messages: i32,
    antispam_window_seconds: i64,
    antispam_timeout_seconds: i64,
    antilink_enabled: bool,
    bot_autorole_id: Option<i64>,
    human_autorole_id: Option<i64>,
    starboard_channel_id: Option<i64>,
    starboard_threshold: i32,
}

/// Load a guild's settings through the cache. An absent row yields the
/// documented defaults without materializing anything; the row appears on
/// first write.
pub async fn get_guild_settings(db: &Database, guild_id: u64) -> anyhow::Result<GuildSettings> {
    let cache_key = guild_settings_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            load_guild_settings(db, guild_id).await
        })
        .await
}

async fn load_guild_settings(db: &Database, guild_id: u64) -> anyhow::Result<GuildSettings> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let row: Option<GuildSettingsRow> = sqlx::query_as(
        "SELECT guild_id, prefix, welcome_channel_id, welcome_template, log_channel_id, mute_role_id,
                antispam_enabled, antispam_max_messages, antispam_window_seconds, antispam_timeout_seconds,
                antilink_enabled, bot_autorole_id, human_autorole_id, starboard_channel_id, starboard_threshold
         FROM guild_settings
         WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    match row {
        Some(row) => to_settings(row),
        None => Ok(GuildSettings::defaults_for(guild_id)),
    }
}

/// Upsert the whole aggregate and invalidate the cached copy. Every writer
/// (config commands and the dashboard API) goes through here, which keeps
/// the database row the single source of truth.
pub async fn save_guild_settings(db: &Database, settings: &GuildSettings) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(settings.guild_id).context("guild_id out of i64 range")?;
    let welcome_channel_id_i64 = settings
        .welcome_channel_id
        .map(i64::try_from)
        .transpose()
        .context("welcome_channel_id out of i64 range")?;
    let log_channel_id_i64 = settings
        .log_channel_id
        .map(i64::try_from)
        .transpose()
        .context("log_channel_id out of i64 range")?;
    let mute_role_id_i64 = settings
        .mute_role_id
        .map(i64::try_from)
        .transpose()
        .context("mute_role_id out of i64 range")?;
    let antispam_max_messages_i32 = i32::try_from(settings.automod.antispam_max_messages)
        .context("antispam_max_messages out of i32 range")?;
    let antispam_window_seconds_i64 = i64::try_from(settings.automod.antispam_window_seconds)
        .context("antispam_window_seconds out of i64 range")?;
    let antispam_timeout_seconds_i64 = i64::try_from(settings.automod.antispam_timeout_seconds)
        .context("antispam_timeout_seconds out of i64 range")?;
    let bot_autorole_id_i64 = settings
        .bot_autorole_id
        .map(i64::try_from)
        .transpose()
        .context("bot_autorole_id out of i64 range")?;
    let human_autorole_id_i64 = settings
        .human_autorole_id
        .map(i64::try_from)
        .transpose()
        .context("human_autorole_id out of i64 range")?;
    let starboard_channel_id_i64 = settings
        .starboard
        .channel_id
        .map(i64::try_from)
        .transpose()
        .context("starboard_channel_id out of i64 range")?;
    let starboard_threshold_i32 = i32::try_from(settings.starboard.threshold)
        .context("starboard_threshold out of i32 range")?;

    sqlx::query(
        "INSERT INTO guild_settings (
            guild_id, prefix, welcome_channel_id, welcome_template, log_channel_id, mute_role_id,
            antispam_enabled, antispam_max_messages, antispam_window_seconds, antispam_timeout_seconds,
            antilink_enabled, bot_autorole_id, human_autorole_id, starboard_channel_id, starboard_threshold
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         ON CONFLICT (guild_id) DO UPDATE SET
            prefix = EXCLUDED.prefix,
            welcome_channel_id = EXCLUDED.welcome_channel_id,
            welcome_template = EXCLUDED.welcome_template,
            log_channel_id = EXCLUDED.log_channel_id,
            mute_role_id = EXCLUDED.mute_role_id,
            antispam_enabled = EXCLUDED.antispam_enabled,
            antispam_max_messages = EXCLUDED.antispam_max_messages,
            antispam_window_seconds = EXCLUDED.antispam_window_seconds,
            antispam_timeout_seconds = EXCLUDED.antispam_timeout_seconds,
            antilink_enabled = EXCLUDED.antilink_enabled,
            bot_autorole_id = EXCLUDED.bot_autorole_id,
            human_autorole_id = EXCLUDED.human_autorole_id,
            starboard_channel_id = EXCLUDED.starboard_channel_id,
            starboard_threshold = EXCLUDED.starboard_threshold",
    )
    .bind(guild_id_i64)
    .bind(settings.prefix.as_deref())
    .bind(welcome_channel_id_i64)
    .bind(settings.welcome_template.as_deref())
    .bind(log_channel_id_i64)
    .bind(mute_role_id_i64)
    .bind(settings.automod.antispam_enabled)
    .bind(antispam_max_messages_i32)
    .bind(antispam_window_seconds_i64)
    .bind(antispam_timeout_seconds_i64)
    .bind(settings.automod.antilink_enabled)
    .bind(bot_autorole_id_i64)
    .bind(human_autorole_id_i64)
    .bind(starboard_channel_id_i64)
    .bind(starboard_threshold_i32)
    .execute(db.pool())
    .await?;

    invalidate_guild_settings(db.cache(), settings.guild_id).await?;

    Ok(())
}

/// Shortcut for the most common read on the error/report path.
pub async fn get_log_channel_id(db: &Database, guild_id: u64) -> anyhow::Result<Option<u64>> {
    Ok(get_guild_settings(db, guild_id).await?.log_channel_id)
}

fn to_settings(row: GuildSettingsRow) -> anyhow::Result<GuildSettings> {
    Ok(GuildSettings {
        guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
        prefix: row.prefix,
        welcome_channel_id: row
            .welcome_channel_id
            .map(u64::try_from)
            .transpose()
            .context("welcome_channel_id row out of u64 range")?,
        welcome_template: row.welcome_template,
        log_channel_id: row
            .log_channel_id
            .map(u64::try_from)
            .transpose()
            .context("log_channel_id row out of u64 range")?,
        mute_role_id: row
            .mute_role_id
            .map(u64::try_from)
            .transpose()
            .context("mute_role_id row out of u64 range")?,
        automod: AutomodConfig {
            antispam_enabled: row.antispam_enabled,
            antispam_max_messages: u32::try_from(row.antispam_max_messages)
                .context("antispam_max_messages row out of u32 range")?,
            antispam_window_seconds: u64::try_from(row.antispam_window_seconds)
                .context("antispam_window_seconds row out of u64 range")?,
            antispam_timeout_seconds: u64::try_from(row.antispam_timeout_seconds)
                .context("antispam_timeout_seconds row out of u64 range")?,
            antilink_enabled: row.antilink_enabled,
        },
        bot_autorole_id: row
            .bot_autorole_id
            .map(u64::try_from)
            .transpose()
            .context("bot_autorole_id row out of u64 range")?,
        human_autorole_id: row
            .human_autorole_id
            .map(u64::try_from)
            .transpose()
            .context("human_autorole_id row out of u64 range")?,
        starboard: StarboardConfig {
            channel_id: row
                .starboard_channel_id
                .map(u64::try_from)
                .transpose()
                .context("starboard_channel_id row out of u64 range")?,
            threshold: u32::try_from(row.starboard_threshold)
                .context("starboard_threshold row out of u32 range")?,
        },
    })
}
