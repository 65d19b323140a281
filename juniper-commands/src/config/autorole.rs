use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::parse::parse_role_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "autorole",
    aliases: &[],
    desc: "Set the roles given to new members and bots on join.",
    category: "config",
    usage: "!autorole [human|bot @role|clear]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn autorole(
    ctx: Context<'_>,
    #[description = "Which auto-role: human or bot"] kind: Option<String>,
    #[description = "Role mention/id, or 'clear'"] role: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let mut settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;

    let Some(kind) = kind
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        let human = settings
            .human_autorole_id
            .map(|id| format!("<@&{id}>"))
            .unwrap_or_else(|| "not set".to_owned());
        let bot = settings
            .bot_autorole_id
            .map(|id| format!("<@&{id}>"))
            .unwrap_or_else(|| "not set".to_owned());
        ctx.say(format!("Auto-roles — humans: {human}, bots: {bot}"))
            .await?;
        return Ok(());
    };

    let is_human = if kind.eq_ignore_ascii_case("human") {
        true
    } else if kind.eq_ignore_ascii_case("bot") {
        false
    } else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(role_input) = role
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if role_input.eq_ignore_ascii_case("clear") {
        if is_human {
            settings.human_autorole_id = None;
        } else {
            settings.bot_autorole_id = None;
        }
        save_guild_settings(&ctx.data().db, &settings).await?;
        ctx.say(format!("{kind} auto-role cleared.")).await?;
        return Ok(());
    }

    let Some(role_id) = parse_role_id(role_input) else {
        ctx.say("Provide a valid role mention/id, or `clear`.").await?;
        return Ok(());
    };

    if is_human {
        settings.human_autorole_id = Some(role_id);
    } else {
        settings.bot_autorole_id = Some(role_id);
    }
    save_guild_settings(&ctx.data().db, &settings).await?;
    ctx.say(format!("{kind} auto-role set to <@&{role_id}>."))
        .await?;

    Ok(())
}
