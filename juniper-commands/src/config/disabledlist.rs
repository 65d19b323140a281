use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_database::impls::disabled_commands::list_rules;
use juniper_utils::pagination::paginate_embed_pages;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "disabledlist",
    aliases: &["disabled"],
    desc: "List every disabled command and category.",
    category: "config",
    usage: "!disabledlist",
    cooldown_secs: 3,
};

const RULES_PER_PAGE: usize = 10;

#[poise::command(prefix_command, slash_command, aliases("disabled"), category = "Config")]
pub async fn disabledlist(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let rules = list_rules(&ctx.data().db, guild_id.get()).await?;
    if rules.is_empty() {
        ctx.say("Nothing is disabled in this server.").await?;
        return Ok(());
    }

    let pages = rules
        .chunks(RULES_PER_PAGE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|rule| {
                    let target = match (&rule.command, &rule.category) {
                        (Some(command), _) => format!("command `{command}`"),
                        (None, Some(category)) => format!("category `{category}`"),
                        (None, None) => "unknown target".to_owned(),
                    };
                    let scope = match rule.channel_id {
                        Some(channel_id) => format!("<#{channel_id}>"),
                        None => "guild-wide".to_owned(),
                    };
                    format!(
                        "{target} • {scope} • by <@{}> <t:{}:R>",
                        rule.disabled_by, rule.disabled_at
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>();

    paginate_embed_pages(ctx, "Disabled Commands", &pages, 1).await?;
    Ok(())
}
