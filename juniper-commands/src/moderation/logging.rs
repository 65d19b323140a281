use tracing::error;

use poise::serenity_prelude as serenity;

use juniper_core::Context;
use juniper_database::Database;
use juniper_database::impls::cases::{NewCase, create_case};
use juniper_database::impls::guild_settings::get_log_channel_id;
use juniper_database::model::cases::CaseRecord;
use juniper_utils::embed::DEFAULT_EMBED_COLOR;
use juniper_utils::formatting::{case_label, format_compact_duration, sanitize_mentions};

/// Append a moderation case and publish it to the configured log channel.
///
/// Best-effort by design: the platform action already happened, so a
/// storage failure here is logged and swallowed rather than undoing or
/// blocking the action. No case row is written in that event, which also
/// means no number can be duplicated. Returns the case number on success.
pub async fn record_case(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    new_case: NewCase<'_>,
) -> Option<u64> {
    let case = match create_case(db, new_case).await {
        Ok(case) => case,
        Err(source) => {
            error!(?source, "failed to create moderation case");
            return None;
        }
    };

    if let Err(source) = publish_case_to_log_channel(http, db, guild_id, &case).await {
        error!(?source, "failed to publish case to the configured log channel");
    }

    Some(case.case_number)
}

/// Command-context wrapper around [`record_case`].
pub async fn create_case_and_publish(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    new_case: NewCase<'_>,
) -> Option<u64> {
    record_case(ctx.http(), &ctx.data().db, guild_id, new_case).await
}

async fn publish_case_to_log_channel(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    case: &CaseRecord,
) -> Result<(), serenity::Error> {
    let channel_id = match get_log_channel_id(db, guild_id.get()).await {
        Ok(channel_id) => channel_id,
        Err(source) => {
            error!(?source, "failed to read log channel config");
            None
        }
    };

    let Some(channel_id) = channel_id else {
        return Ok(());
    };

    let mut fields = Vec::new();
    fields.push(format!("**Action :** {}", case.action.display_name()));

    if let Some(target_user_id) = case.target_user_id {
        fields.push(format!("**Target :** <@{}>", target_user_id));
    }

    fields.push(format!("**Reason :** {}", sanitize_mentions(&case.reason)));

    if let Some(duration_seconds) = case.duration_seconds {
        fields.push(format!(
            "**Duration :** {}",
            format_compact_duration(duration_seconds)
        ));
    }

    fields.push(format!("**Moderator :** <@{}>", case.moderator_user_id));
    fields.push(format!(
        "**When :** <t:{}:R> • <t:{}:f>",
        case.created_at, case.created_at,
    ));

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(case_label(case.case_number))
        .description(fields.join("\n"));

    serenity::ChannelId::new(channel_id)
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await?;

    Ok(())
}
