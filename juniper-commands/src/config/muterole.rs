use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::parse::parse_role_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "muterole",
    aliases: &[],
    desc: "Set or view the role used by mute/unmute.",
    category: "config",
    usage: "!muterole [@role|role_id|clear]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn muterole(
    ctx: Context<'_>,
    #[description = "Role mention/id, or 'clear'"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let mut settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;

    if let Some(input) = input
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        if input.eq_ignore_ascii_case("clear") {
            settings.mute_role_id = None;
            save_guild_settings(&ctx.data().db, &settings).await?;
            ctx.say("Mute role cleared.").await?;
            return Ok(());
        }

        if let Some(role_id) = parse_role_id(input) {
            settings.mute_role_id = Some(role_id);
            save_guild_settings(&ctx.data().db, &settings).await?;
            ctx.say(format!("Mute role set to <@&{}>.", role_id)).await?;
            return Ok(());
        }

        ctx.say("Provide a valid role mention/id, or `clear`.").await?;
        return Ok(());
    }

    if let Some(role_id) = settings.mute_role_id {
        ctx.say(format!("Current mute role: <@&{}>", role_id)).await?;
    } else {
        ctx.say("No mute role configured.").await?;
    }

    Ok(())
}
