use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::create_case_and_publish;
use juniper_core::{Context, Error};
use juniper_database::impls::cases::NewCase;
use juniper_database::model::cases::ModAction;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    aliases: &["clear"],
    desc: "Bulk-delete recent messages in this channel.",
    category: "moderation",
    usage: "!purge <count 2-100>",
    cooldown_secs: 5,
};

#[poise::command(prefix_command, slash_command, aliases("clear"), category = "Moderation")]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "How many messages to delete (2-100)"] count: Option<u8>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let Some(count) = count.filter(|count| (2..=100).contains(count)) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let channel_id = ctx.channel_id();
    let messages = match channel_id
        .messages(ctx.http(), serenity::GetMessages::new().limit(count))
        .await
    {
        Ok(messages) => messages,
        Err(source) => {
            error!(?source, "message fetch for purge failed");
            ctx.say("I couldn't read this channel's history.").await?;
            return Ok(());
        }
    };

    if messages.is_empty() {
        ctx.say("Nothing to delete.").await?;
        return Ok(());
    }

    let message_ids: Vec<serenity::MessageId> =
        messages.iter().map(|message| message.id).collect();
    let deleted = message_ids.len();

    let delete_result = if deleted == 1 {
        channel_id.delete_message(ctx.http(), message_ids[0]).await
    } else {
        channel_id.delete_messages(ctx.http(), message_ids).await
    };

    if let Err(source) = delete_result {
        error!(?source, "bulk delete failed");
        ctx.say("I couldn't delete messages here. Messages older than 14 days can't be bulk-deleted.")
            .await?;
        return Ok(());
    }

    let case_reason = format!("Purged {deleted} message(s)");
    create_case_and_publish(
        &ctx,
        guild_id,
        NewCase {
            guild_id: guild_id.get(),
            target_user_id: None,
            moderator_user_id: ctx.author().id.get(),
            action: ModAction::Other,
            reason: &case_reason,
            duration_seconds: None,
        },
    )
    .await;

    ctx.say(format!("Deleted {deleted} message(s).")).await?;

    Ok(())
}
