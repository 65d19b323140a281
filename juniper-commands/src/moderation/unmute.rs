use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, moderation_action_embed, target_profile_from_user, usage_message,
};
use crate::moderation::logging::create_case_and_publish;
use juniper_core::{Context, Error};
use juniper_database::impls::cases::NewCase;
use juniper_database::impls::guild_settings::get_guild_settings;
use juniper_database::model::cases::ModAction;
use juniper_utils::formatting::case_label;
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unmute",
    aliases: &[],
    desc: "Remove the configured mute role from a user.",
    category: "moderation",
    usage: "!unmute <user> [reason]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "The user to unmute"] user: Option<serenity::User>,
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

    let settings = get_guild_settings(&ctx.data().db, guild_id.get()).await?;
    let Some(mute_role_id) = settings.mute_role_id else {
        ctx.say("No mute role configured. Set one with `!muterole` first.")
            .await?;
        return Ok(());
    };

    let member = match guild_id.member(ctx.http(), user.id).await {
        Ok(member) => member,
        Err(source) => {
            error!(?source, "member lookup for unmute failed");
            ctx.say("I couldn't find that user in this server.").await?;
            return Ok(());
        }
    };

    if let Err(source) = member
        .remove_role(ctx.http(), serenity::RoleId::new(mute_role_id))
        .await
    {
        error!(?source, "mute role removal failed");
        ctx.say("I couldn't remove the mute role. Check role hierarchy and permissions.")
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
            action: ModAction::Other,
            reason: &case_reason,
            duration_seconds: None,
        },
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let mut embed =
        moderation_action_embed(&target_profile, user.id, "unmuted", reason.as_deref(), None);
    if let Some(case_number) = case_number {
        embed = embed.footer(serenity::CreateEmbedFooter::new(case_label(case_number)));
    }
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
