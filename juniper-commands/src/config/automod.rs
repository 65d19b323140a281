use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::embed::notice_embed;
use juniper_utils::formatting::format_compact_duration;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "automod",
    aliases: &[],
    desc: "Toggle the anti-spam and anti-link checks.",
    category: "config",
    usage: "!automod [antispam|antilink on|off]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn automod(
    ctx: Context<'_>,
    #[description = "Feature: antispam or antilink"] feature: Option<String>,
    #[description = "on or off"] state: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let mut settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;

    let Some(feature) = feature
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        let automod = &settings.automod;
        let description = format!(
            "**Anti-spam :** {} ({} messages / {}s, timeout {})\n**Anti-link :** {}",
            on_off(automod.antispam_enabled),
            automod.antispam_max_messages,
            automod.antispam_window_seconds,
            format_compact_duration(automod.antispam_timeout_seconds),
            on_off(automod.antilink_enabled),
        );
        ctx.send(
            poise::CreateReply::default().embed(notice_embed("Auto-mod", description)),
        )
        .await?;
        return Ok(());
    };

    let enabled = match state.as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("on") => true,
        Some(value) if value.eq_ignore_ascii_case("off") => false,
        _ => {
            ctx.say(usage_message(META.usage)).await?;
            return Ok(());
        }
    };

    let label = if feature.eq_ignore_ascii_case("antispam") {
        settings.automod.antispam_enabled = enabled;
        "Anti-spam"
    } else if feature.eq_ignore_ascii_case("antilink") {
        settings.automod.antilink_enabled = enabled;
        "Anti-link"
    } else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    save_guild_settings(&ctx.data().db, &settings).await?;
    ctx.say(format!("{label} is now {}.", on_off(enabled))).await?;

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
