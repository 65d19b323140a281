use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::parse::parse_channel_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "starboard",
    aliases: &[],
    desc: "Configure the starboard channel and star threshold.",
    category: "config",
    usage: "!starboard [#channel [threshold]|clear]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn starboard(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"] target: Option<String>,
    #[description = "Stars required to post (default 3)"] threshold: Option<u32>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let mut settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;

    let Some(target) = target
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    else {
        match settings.starboard.channel_id {
            Some(channel_id) => {
                ctx.say(format!(
                    "Starboard: <#{}> at {}+ stars.",
                    channel_id, settings.starboard.threshold
                ))
                .await?;
            }
            None => {
                ctx.say("Starboard is disabled.").await?;
            }
        }
        return Ok(());
    };

    if target.eq_ignore_ascii_case("clear") {
        settings.starboard.channel_id = None;
        save_guild_settings(&ctx.data().db, &settings).await?;
        ctx.say("Starboard disabled.").await?;
        return Ok(());
    }

    let Some(channel_id) = parse_channel_id(target) else {
        ctx.say("Provide a valid channel mention/id, or `clear`.")
            .await?;
        return Ok(());
    };

    settings.starboard.channel_id = Some(channel_id);
    if let Some(threshold) = threshold.filter(|threshold| *threshold >= 1) {
        settings.starboard.threshold = threshold;
    }
    save_guild_settings(&ctx.data().db, &settings).await?;
    ctx.say(format!(
        "Starboard set to <#{}> at {}+ stars.",
        channel_id, settings.starboard.threshold
    ))
    .await?;

    Ok(())
}
