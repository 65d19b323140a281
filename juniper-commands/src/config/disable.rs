use poise::serenity_prelude as serenity;

use crate::dispatch::GUARD_EXEMPT_COMMANDS;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::{CommandMeta, category_names, resolve_command_name, similar_commands};
use juniper_core::{Context, Error};
use juniper_database::impls::disabled_commands::{
    DisableOutcome, SuppressionTarget, disable_target,
};
use juniper_utils::parse::parse_channel_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "disable",
    aliases: &[],
    desc: "Disable a command or category, guild-wide or in one channel.",
    category: "config",
    usage: "!disable <command|category> [#channel]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn disable(
    ctx: Context<'_>,
    #[description = "Command or category to disable"] target: Option<String>,
    #[description = "Restrict to one channel (default: guild-wide)"] channel: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let Some(target_raw) = target
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let channel_id = match channel.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let Some(channel_id) = parse_channel_id(raw) else {
                ctx.say("Provide a valid channel mention/id.").await?;
                return Ok(());
            };
            Some(channel_id)
        }
        _ => None,
    };

    let suppression_target = if let Some(name) = resolve_command_name(target_raw) {
        if GUARD_EXEMPT_COMMANDS.contains(&name) {
            ctx.say(format!("`{name}` manages the disable list and can't be disabled."))
                .await?;
            return Ok(());
        }
        SuppressionTarget::Command(name)
    } else {
        let lowered = target_raw.to_ascii_lowercase();
        match category_names()
            .iter()
            .copied()
            .find(|category| *category == lowered)
        {
            Some(category) => SuppressionTarget::Category(category),
            None => {
                let suggestions = similar_commands(target_raw);
                let mut message = format!("Unknown command or category: `{target_raw}`.");
                if !suggestions.is_empty() {
                    message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
                }
                ctx.say(message).await?;
                return Ok(());
            }
        }
    };

    let scope = match channel_id {
        Some(channel_id) => format!("in <#{channel_id}>"),
        None => "guild-wide".to_owned(),
    };

    match disable_target(
        &ctx.data().db,
        guild_id.get(),
        channel_id,
        suppression_target,
        ctx.author().id.get(),
    )
    .await?
    {
        DisableOutcome::Created => {
            ctx.say(format!("Disabled `{target_raw}` {scope}.")).await?;
        }
        DisableOutcome::AlreadyDisabled => {
            ctx.say(format!("`{target_raw}` is already disabled {scope}."))
                .await?;
        }
    }

    Ok(())
}
