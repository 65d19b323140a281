use std::time::Duration;

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use crate::moderation::logging::record_case;
use juniper_core::{Context, Error};
use juniper_database::impls::cases::NewCase;
use juniper_database::model::cases::ModAction;
use juniper_utils::confirmation::{CONFIRM_TIMEOUT_SECS, prompt_confirm_cancel, settle_confirmation};
use juniper_utils::embed::notice_embed;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "nuke",
    aliases: &[],
    desc: "Clone this channel and delete the original, wiping its history (DANGER).",
    category: "moderation",
    usage: "!nuke [reason]",
    cooldown_secs: 30,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn nuke(
    ctx: Context<'_>,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let channel = match ctx.channel_id().to_channel(ctx.http()).await {
        Ok(channel) => channel.guild(),
        Err(source) => {
            error!(?source, "channel lookup for nuke failed");
            None
        }
    };
    let Some(channel) = channel else {
        ctx.say("I couldn't resolve this channel.").await?;
        return Ok(());
    };

    let confirmation = prompt_confirm_cancel(
        ctx,
        "This deletes the channel and recreates it empty.",
        notice_embed(
            "Nuke channel?",
            format!(
                "Channel: <#{}>\nEvery message in it will be lost.",
                channel.id.get()
            ),
        ),
        Duration::from_secs(CONFIRM_TIMEOUT_SECS),
    )
    .await?;

    // No response within the window means cancelled.
    let Some(_interaction) = settle_confirmation(
        ctx,
        confirmation,
        "Nuke cancelled (no response).",
        "Nuke cancelled.",
        "Nuking channel...",
    )
    .await?
    else {
        return Ok(());
    };

    let mut builder = serenity::CreateChannel::new(channel.name.clone())
        .kind(channel.kind)
        .position(channel.position)
        .nsfw(channel.nsfw)
        .permissions(channel.permission_overwrites.clone());
    if let Some(topic) = channel.topic.clone() {
        builder = builder.topic(topic);
    }
    if let Some(parent_id) = channel.parent_id {
        builder = builder.category(parent_id);
    }

    let replacement = match guild_id.create_channel(ctx.http(), builder).await {
        Ok(replacement) => replacement,
        Err(source) => {
            error!(?source, "nuke replacement channel creation failed");
            ctx.say("I couldn't recreate the channel, so nothing was deleted.")
                .await?;
            return Ok(());
        }
    };

    if let Err(source) = channel.delete(ctx.http()).await {
        error!(?source, "nuke channel deletion failed");
        // The clone exists; tell the moderator there instead of the
        // original, which may be in a weird state.
        let _ = replacement
            .say(
                ctx.http(),
                "I cloned the channel but couldn't delete the original.",
            )
            .await;
        return Ok(());
    }

    let case_reason = reason.as_deref().unwrap_or("No reason provided").to_owned();
    let case_number = record_case(
        ctx.http(),
        &ctx.data().db,
        guild_id,
        NewCase {
            guild_id: guild_id.get(),
            target_user_id: None,
            moderator_user_id: ctx.author().id.get(),
            action: ModAction::Nuke,
            reason: &case_reason,
            duration_seconds: None,
        },
    )
    .await;

    let mut description = format!("Channel nuked by <@{}>.", ctx.author().id.get());
    if let Some(case_number) = case_number {
        description.push_str(&format!(" Case #{case_number}."));
    }
    let _ = replacement
        .send_message(
            ctx.http(),
            serenity::CreateMessage::new().embed(notice_embed("Channel nuked", description)),
        )
        .await;

    Ok(())
}
