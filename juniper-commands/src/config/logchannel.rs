use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::parse::parse_channel_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "logchannel",
    aliases: &["modlog"],
    desc: "Set or view the moderation/error log channel.",
    category: "config",
    usage: "!logchannel [#channel|channel_id|clear]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, aliases("modlog"), category = "Config")]
pub async fn logchannel(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"]
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
            settings.log_channel_id = None;
            save_guild_settings(&ctx.data().db, &settings).await?;
            ctx.say("Log channel cleared.").await?;
            return Ok(());
        }

        if let Some(channel_id) = parse_channel_id(input) {
            settings.log_channel_id = Some(channel_id);
            save_guild_settings(&ctx.data().db, &settings).await?;
            ctx.say(format!("Log channel set to <#{}>.", channel_id))
                .await?;
            return Ok(());
        }

        ctx.say("Provide a valid channel mention/id, or `clear`.")
            .await?;
        return Ok(());
    }

    if let Some(channel_id) = settings.log_channel_id {
        ctx.say(format!("Current log channel: <#{}>", channel_id))
            .await?;
    } else {
        ctx.say("No log channel configured.").await?;
    }

    Ok(())
}
