use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::{Context, Error};
use juniper_database::impls::tags::{
    TagCreateOutcome, create_tag, delete_tag, get_tag, list_tag_names,
};
use juniper_utils::pagination::paginate_embed_pages;
use juniper_utils::permissions::require_user_permission;

pub const TAG_META: CommandMeta = CommandMeta {
    name: "tag",
    aliases: &["t"],
    desc: "Post a saved tag.",
    category: "utility",
    usage: "!tag <name>",
    cooldown_secs: 3,
};

pub const TAGS_META: CommandMeta = CommandMeta {
    name: "tags",
    aliases: &[],
    desc: "List this server's tags.",
    category: "utility",
    usage: "!tags",
    cooldown_secs: 5,
};

pub const TAGADD_META: CommandMeta = CommandMeta {
    name: "tagadd",
    aliases: &[],
    desc: "Create a tag.",
    category: "utility",
    usage: "!tagadd <name> <content...>",
    cooldown_secs: 3,
};

pub const TAGDEL_META: CommandMeta = CommandMeta {
    name: "tagdel",
    aliases: &[],
    desc: "Delete a tag.",
    category: "utility",
    usage: "!tagdel <name>",
    cooldown_secs: 3,
};

const TAGS_PER_PAGE: usize = 25;
const MAX_TAG_NAME_LEN: usize = 50;

#[poise::command(prefix_command, slash_command, aliases("t"), category = "Utility")]
pub async fn tag(
    ctx: Context<'_>,
    #[description = "Tag name"] name: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(name) = normalize_tag_name(name.as_deref()) else {
        ctx.say(usage_message(TAG_META.usage)).await?;
        return Ok(());
    };

    match get_tag(&ctx.data().db, guild_id.get(), &name).await? {
        // Tag content is trusted moderator-authored text; post it as-is.
        Some(tag) => {
            ctx.say(tag.content).await?;
        }
        None => {
            ctx.say(format!("No tag named `{name}`. See `!tags`.")).await?;
        }
    }

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn tags(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let names = list_tag_names(&ctx.data().db, guild_id.get()).await?;
    if names.is_empty() {
        ctx.say("This server has no tags yet. Create one with `!tagadd`.")
            .await?;
        return Ok(());
    }

    let pages = names
        .chunks(TAGS_PER_PAGE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|name| format!("`{name}`"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>();
    paginate_embed_pages(ctx, "Tags", &pages, 1).await?;

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn tagadd(
    ctx: Context<'_>,
    #[description = "Tag name"] name: Option<String>,
    #[description = "Tag content"]
    #[rest]
    content: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let name = normalize_tag_name(name.as_deref());
    let content = content
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    let (Some(name), Some(content)) = (name, content) else {
        ctx.say(usage_message(TAGADD_META.usage)).await?;
        return Ok(());
    };

    match create_tag(
        &ctx.data().db,
        guild_id.get(),
        &name,
        content,
        ctx.author().id.get(),
    )
    .await?
    {
        TagCreateOutcome::Created => {
            ctx.say(format!("Tag `{name}` created.")).await?;
        }
        TagCreateOutcome::AlreadyExists => {
            ctx.say(format!(
                "Tag `{name}` already exists. Delete it first with `!tagdel {name}`."
            ))
            .await?;
        }
    }

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn tagdel(
    ctx: Context<'_>,
    #[description = "Tag name"] name: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let Some(name) = normalize_tag_name(name.as_deref()) else {
        ctx.say(usage_message(TAGDEL_META.usage)).await?;
        return Ok(());
    };

    if delete_tag(&ctx.data().db, guild_id.get(), &name).await? {
        ctx.say(format!("Tag `{name}` deleted.")).await?;
    } else {
        ctx.say(format!("No tag named `{name}`.")).await?;
    }

    Ok(())
}

fn normalize_tag_name(raw: Option<&str>) -> Option<String> {
    let name = raw?.trim().to_ascii_lowercase();
    if name.is_empty() || name.len() > MAX_TAG_NAME_LEN {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::normalize_tag_name;

    #[test]
    fn tag_names_are_normalized() {
        assert_eq!(normalize_tag_name(Some("  Rules ")), Some("rules".to_owned()));
        assert_eq!(normalize_tag_name(Some("")), None);
        assert_eq!(normalize_tag_name(None), None);
        assert_eq!(normalize_tag_name(Some(&"x".repeat(51))), None);
    }
}
