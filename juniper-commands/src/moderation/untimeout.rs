use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, moderation_action_embed, target_profile_from_user, usage_message,
};
use crate::moderation::logging::create_case_and_publish;
use juniper_core::{Context, Error};
use juniper_database::impls::cases::NewCase;
use juniper_database::model::cases::ModAction;
use juniper_utils::formatting::case_label;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "untimeout",
    aliases: &["unto"],
    desc: "Remove an active timeout from a user.",
    category: "moderation",
    usage: "!untimeout <user> [reason]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, aliases("unto"), category = "Moderation")]
pub async fn untimeout(
    ctx: Context<'_>,
    #[description = "The user to release"] user: Option<serenity::User>,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MODERATE_MEMBERS).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let edit = serenity::EditMember::new().enable_communication();
    let untimeout_result = guild_id.edit_member(ctx.http(), user.id, edit).await;

    if let Err(source) = untimeout_result {
        error!(?source, "untimeout request failed");
        ctx.say("I couldn't remove that user's timeout. Are they still in the server?")
            .await?;
        return Ok(());
    }

    let case_reason = reason.as_deref().unwrap_or("No reason provided").to_owned();
    let case_number = create_case_and_publish(
        &ctx,
        guild_id,
        NewCase {
            guild_id: guild_id.get(),
            target_user_id: Some(user.id.get()),
            moderator_user_id: ctx.author().id.get(),
            action: ModAction::Untimeout,
            reason: &case_reason,
            duration_seconds: None,
        },
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let mut embed = moderation_action_embed(
        &target_profile,
        user.id,
        "released from timeout",
        reason.as_deref(),
        None,
    );
    if let Some(case_number) = case_number {
        embed = embed.footer(serenity::CreateEmbedFooter::new(case_label(case_number)));
    }
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
