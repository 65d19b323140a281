use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "prefix",
    aliases: &[],
    desc: "Set or view this server's command prefix.",
    category: "config",
    usage: "!prefix [new_prefix|reset]",
    cooldown_secs: 3,
};

const MAX_PREFIX_LEN: usize = 5;

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn prefix(
    ctx: Context<'_>,
    #[description = "New prefix, or 'reset'"] new_prefix: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let mut settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;

    let Some(input) = new_prefix
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        let effective = settings
            .prefix
            .as_deref()
            .unwrap_or(&ctx.data().default_prefix);
        ctx.say(format!("Current prefix: `{effective}`")).await?;
        return Ok(());
    };

    if input.eq_ignore_ascii_case("reset") {
        settings.prefix = None;
        save_guild_settings(&ctx.data().db, &settings).await?;
        ctx.say(format!(
            "Prefix reset to the default `{}`.",
            ctx.data().default_prefix
        ))
        .await?;
        return Ok(());
    }

    if input.len() > MAX_PREFIX_LEN || input.chars().any(char::is_whitespace) {
        ctx.say(format!(
            "Prefix must be 1-{MAX_PREFIX_LEN} characters with no whitespace."
        ))
        .await?;
        return Ok(());
    }

    settings.prefix = Some(input.to_owned());
    save_guild_settings(&ctx.data().db, &settings).await?;
    ctx.say(format!("Prefix set to `{input}`.")).await?;

    Ok(())
}
