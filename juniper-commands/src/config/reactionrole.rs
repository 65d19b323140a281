use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::{Context, Error};
use juniper_database::impls::reaction_roles::{add_binding, list_bindings, remove_binding};
use juniper_database::model::reaction_roles::ReactionRoleBinding;
use juniper_utils::pagination::paginate_embed_pages;
use juniper_utils::parse::parse_role_id;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "reactionrole",
    aliases: &["rr"],
    desc: "Bind emoji reactions on a message to roles.",
    category: "config",
    usage: "!reactionrole <add|remove|list> [message_id] [emoji] [@role]",
    cooldown_secs: 3,
};

const BINDINGS_PER_PAGE: usize = 10;

#[poise::command(prefix_command, slash_command, aliases("rr"), category = "Config")]
pub async fn reactionrole(
    ctx: Context<'_>,
    #[description = "add, remove, or list"] action: Option<String>,
    #[description = "Target message id"] message_id: Option<String>,
    #[description = "Emoji to bind"] emoji: Option<String>,
    #[description = "Role mention/id (for add)"] role: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let action = action
        .as_deref()
        .map(str::trim)
        .map(str::to_ascii_lowercase);

    match action.as_deref() {
        Some("list") => {
            let bindings = list_bindings(&ctx.data().db, guild_id.get()).await?;
            if bindings.is_empty() {
                ctx.say("No reaction roles configured.").await?;
                return Ok(());
            }

            let pages = bindings
                .chunks(BINDINGS_PER_PAGE)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|binding| {
                            format!(
                                "message `{}` • {} → <@&{}>",
                                binding.message_id, binding.emoji, binding.role_id
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect::<Vec<_>>();
            paginate_embed_pages(ctx, "Reaction Roles", &pages, 1).await?;
        }
        Some("add") => {
            let (Some(message_id), Some(emoji), Some(role)) = (
                message_id.as_deref().and_then(|raw| raw.trim().parse::<u64>().ok()),
                emoji.as_deref().map(str::trim).filter(|value| !value.is_empty()),
                role.as_deref().and_then(parse_role_id),
            ) else {
                ctx.say(usage_message(META.usage)).await?;
                return Ok(());
            };

            let binding = ReactionRoleBinding {
                guild_id: guild_id.get(),
                message_id,
                emoji: emoji.to_owned(),
                role_id: role,
            };

            if add_binding(&ctx.data().db, &binding).await? {
                ctx.say(format!(
                    "Bound {} on message `{}` to <@&{}>.",
                    emoji, message_id, role
                ))
                .await?;
            } else {
                ctx.say("That emoji is already bound on that message.").await?;
            }
        }
        Some("remove") => {
            let (Some(message_id), Some(emoji)) = (
                message_id.as_deref().and_then(|raw| raw.trim().parse::<u64>().ok()),
                emoji.as_deref().map(str::trim).filter(|value| !value.is_empty()),
            ) else {
                ctx.say(usage_message(META.usage)).await?;
                return Ok(());
            };

            if remove_binding(&ctx.data().db, guild_id.get(), message_id, emoji).await? {
                ctx.say(format!("Removed {} from message `{}`.", emoji, message_id))
                    .await?;
            } else {
                ctx.say("No such binding.").await?;
            }
        }
        _ => {
            ctx.say(usage_message(META.usage)).await?;
        }
    }

    Ok(())
}
