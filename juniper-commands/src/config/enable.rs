use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::{CommandMeta, category_names, resolve_command_name};
use juniper_core::{Context, Error};
use juniper_database::impls::disabled_commands::{EnableOutcome, SuppressionTarget, enable_target};
use juniper_utils::parse::parse_channel_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "enable",
    aliases: &[],
    desc: "Re-enable a disabled command or category.",
    category: "config",
    usage: "!enable <command|category> [#channel]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn enable(
    ctx: Context<'_>,
    #[description = "Command or category to enable"] target: Option<String>,
    #[description = "Channel the rule was scoped to (default: guild-wide)"] channel: Option<String>,
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
                ctx.say(format!("Unknown command or category: `{target_raw}`."))
                    .await?;
                return Ok(());
            }
        }
    };

    let scope = match channel_id {
        Some(channel_id) => format!("in <#{channel_id}>"),
        None => "guild-wide".to_owned(),
    };

    match enable_target(&ctx.data().db, guild_id.get(), channel_id, suppression_target).await? {
        EnableOutcome::Removed => {
            ctx.say(format!("Enabled `{target_raw}` {scope}.")).await?;
        }
        EnableOutcome::NotDisabled => {
            ctx.say(format!("`{target_raw}` isn't disabled {scope}; nothing to do."))
                .await?;
        }
    }

    Ok(())
}
