use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_utils::parse::parse_channel_id;
use juniper_utils::permissions::require_user_permission;
use juniper_utils::template::DEFAULT_WELCOME_TEMPLATE;

pub const META: CommandMeta = CommandMeta {
    name: "welcome",
    aliases: &[],
    desc: "Configure the welcome channel and message template.",
    category: "config",
    usage: "!welcome [#channel [template...]|clear]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Config")]
pub async fn welcome(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"] target: Option<String>,
    #[description = "Message template ({user}, {server})"]
    #[rest]
    template: Option<String>,
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
        match settings.welcome_channel_id {
            Some(channel_id) => {
                let template = settings
                    .welcome_template
                    .as_deref()
                    .unwrap_or(DEFAULT_WELCOME_TEMPLATE);
                ctx.say(format!(
                    "Welcomes go to <#{}> with template:\n> {}",
                    channel_id, template
                ))
                .await?;
            }
            None => {
                ctx.say("Welcome messages are disabled.").await?;
            }
        }
        return Ok(());
    };

    if target.eq_ignore_ascii_case("clear") {
        settings.welcome_channel_id = None;
        settings.welcome_template = None;
        save_guild_settings(&ctx.data().db, &settings).await?;
        ctx.say("Welcome messages disabled.").await?;
        return Ok(());
    }

    let Some(channel_id) = parse_channel_id(target) else {
        ctx.say("Provide a valid channel mention/id, or `clear`.")
            .await?;
        return Ok(());
    };

    settings.welcome_channel_id = Some(channel_id);
    if let Some(template) = template
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        settings.welcome_template = Some(template.to_owned());
    }
    save_guild_settings(&ctx.data().db, &settings).await?;

    let template = settings
        .welcome_template
        .as_deref()
        .unwrap_or(DEFAULT_WELCOME_TEMPLATE);
    ctx.say(format!(
        "Welcomes will go to <#{}> with template:\n> {}",
        channel_id, template
    ))
    .await?;

    Ok(())
}
