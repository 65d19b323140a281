use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use juniper_commands::utility::giveaway::GIVEAWAY_REACTION;
use juniper_core::Data;
use juniper_database::impls::guild_settings::get_guild_settings;
use juniper_database::impls::reaction_roles::find_binding;
use juniper_database::impls::starboard::{get_post, insert_post, update_star_count};
use juniper_utils::embed::DEFAULT_EMBED_COLOR;

const STAR_REACTION: &str = "⭐";

/// Reaction-role grants, giveaway entries, and the starboard tally.
pub async fn handle_reaction_add(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) {
    let Some(guild_id) = reaction.guild_id else {
        return;
    };
    let Some(user_id) = reaction.user_id else {
        return;
    };
    if user_id == ctx.cache.current_user().id {
        return;
    }

    if reaction.emoji.unicode_eq(GIVEAWAY_REACTION) {
        data.giveaways
            .add_entrant(reaction.message_id.get(), user_id.get());
    }

    let emoji_key = reaction.emoji.to_string();
    match find_binding(&data.db, guild_id.get(), reaction.message_id.get(), &emoji_key).await {
        Ok(Some(role_id)) => {
            if let Err(source) = ctx
                .http
                .add_member_role(
                    guild_id,
                    user_id,
                    serenity::RoleId::new(role_id),
                    Some("reaction role"),
                )
                .await
            {
                warn!(?source, role_id, "reaction role grant failed");
            }
        }
        Ok(None) => {}
        Err(source) => {
            error!(?source, "reaction role lookup failed");
        }
    }

    if reaction.emoji.unicode_eq(STAR_REACTION) {
        handle_star(ctx, data, guild_id, reaction).await;
    }
}

pub async fn handle_reaction_remove(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) {
    let Some(guild_id) = reaction.guild_id else {
        return;
    };
    let Some(user_id) = reaction.user_id else {
        return;
    };
    if user_id == ctx.cache.current_user().id {
        return;
    }

    if reaction.emoji.unicode_eq(GIVEAWAY_REACTION) {
        data.giveaways
            .remove_entrant(reaction.message_id.get(), user_id.get());
    }

    let emoji_key = reaction.emoji.to_string();
    match find_binding(&data.db, guild_id.get(), reaction.message_id.get(), &emoji_key).await {
        Ok(Some(role_id)) => {
            if let Err(source) = ctx
                .http
                .remove_member_role(
                    guild_id,
                    user_id,
                    serenity::RoleId::new(role_id),
                    Some("reaction role removed"),
                )
                .await
            {
                warn!(?source, role_id, "reaction role removal failed");
            }
        }
        Ok(None) => {}
        Err(source) => {
            error!(?source, "reaction role lookup failed");
        }
    }
}

async fn handle_star(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    reaction: &serenity::Reaction,
) {
    let settings = match get_guild_settings(&data.db, guild_id.get()).await {
        Ok(settings) => settings,
        Err(source) => {
            error!(?source, "failed to read guild settings for starboard");
            return;
        }
    };
    let Some(starboard_channel_id) = settings.starboard.channel_id else {
        return;
    };
    // Stars on the starboard itself don't recurse.
    if reaction.channel_id.get() == starboard_channel_id {
        return;
    }

    let message = match reaction.channel_id.message(&ctx.http, reaction.message_id).await {
        Ok(message) => message,
        Err(source) => {
            warn!(?source, "starred message fetch failed");
            return;
        }
    };

    let star_count = message
        .reactions
        .iter()
        .find(|tally| tally.reaction_type.unicode_eq(STAR_REACTION))
        .map_or(0, |tally| tally.count) as u32;

    if star_count < settings.starboard.threshold {
        return;
    }

    let existing = match get_post(&data.db, guild_id.get(), message.id.get()).await {
        Ok(existing) => existing,
        Err(source) => {
            error!(?source, "starboard post lookup failed");
            return;
        }
    };

    if let Some(post) = existing {
        if post.star_count == star_count {
            return;
        }
        if let Err(source) =
            update_star_count(&data.db, guild_id.get(), message.id.get(), star_count).await
        {
            error!(?source, "starboard count update failed");
        }
        let edit = serenity::EditMessage::new().content(star_line(star_count, reaction.channel_id));
        if let Err(source) = serenity::ChannelId::new(starboard_channel_id)
            .edit_message(
                &ctx.http,
                serenity::MessageId::new(post.post_message_id),
                edit,
            )
            .await
        {
            warn!(?source, "starboard post edit failed");
        }
        return;
    }

    let author_name = message
        .author
        .global_name
        .clone()
        .unwrap_or_else(|| message.author.name.clone());
    let excerpt = if message.content.is_empty() {
        "(no text)".to_owned()
    } else {
        message.content.clone()
    };
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(serenity::CreateEmbedAuthor::new(author_name).icon_url(message.author.face()))
        .description(format!("{}\n\n[Jump to message]({})", excerpt, message.link()));

    let posted = serenity::ChannelId::new(starboard_channel_id)
        .send_message(
            &ctx.http,
            serenity::CreateMessage::new()
                .content(star_line(star_count, reaction.channel_id))
                .embed(embed),
        )
        .await;

    let posted = match posted {
        Ok(posted) => posted,
        Err(source) => {
            warn!(?source, "starboard post failed");
            return;
        }
    };

    if let Err(source) = insert_post(
        &data.db,
        guild_id.get(),
        message.id.get(),
        posted.id.get(),
        star_count,
    )
    .await
    {
        error!(?source, "starboard post record failed");
    }
}

fn star_line(star_count: u32, channel_id: serenity::ChannelId) -> String {
    format!("{STAR_REACTION} {star_count} <#{}>", channel_id.get())
}
