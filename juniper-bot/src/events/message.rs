use std::time::{Duration, SystemTime, UNIX_EPOCH};

use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use juniper_commands::moderation::logging::record_case;
use juniper_core::Data;
use juniper_database::impls::cases::NewCase;
use juniper_database::impls::guild_settings::get_guild_settings;
use juniper_database::model::cases::ModAction;
use juniper_utils::formatting::sanitize_mentions;

/// AFK bookkeeping plus the anti-link and anti-spam checks.
pub async fn handle_message(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    if message.author.bot || message.webhook_id.is_some() {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    // Any message from an AFK user brings them back.
    if data
        .afk
        .clear(guild_id.get(), message.author.id.get())
        .is_some()
    {
        let _ = message
            .reply(&ctx.http, "Welcome back! I've removed your AFK status.")
            .await;
    }

    for user in &message.mentions {
        if user.id == message.author.id {
            continue;
        }
        if let Some(status) = data.afk.get(guild_id.get(), user.id.get()) {
            let display_name = user.global_name.as_deref().unwrap_or(&user.name);
            let note = format!(
                "{} is AFK: {} (since <t:{}:R>)",
                display_name,
                sanitize_mentions(&status.reason),
                status.since_unix
            );
            let _ = message.reply(&ctx.http, note).await;
            break;
        }
    }

    let settings = match get_guild_settings(&data.db, guild_id.get()).await {
        Ok(settings) => settings,
        Err(source) => {
            error!(?source, "failed to read guild settings on message");
            return;
        }
    };
    let automod = settings.automod;

    if automod.antilink_enabled && contains_invite_link(&message.content) {
        if let Err(source) = message.delete(&ctx.http).await {
            warn!(?source, "failed to delete invite link message");
        } else {
            let _ = message
                .channel_id
                .say(
                    &ctx.http,
                    format!(
                        "<@{}>, invite links aren't allowed here.",
                        message.author.id.get()
                    ),
                )
                .await;
        }
        return;
    }

    if automod.antispam_enabled {
        let count = data.message_rate.record(
            guild_id.get(),
            message.author.id.get(),
            Duration::from_secs(automod.antispam_window_seconds),
        );

        if count > automod.antispam_max_messages {
            // Drop the window so the same burst is only punished once.
            data.message_rate
                .reset(guild_id.get(), message.author.id.get());
            apply_spam_timeout(ctx, data, guild_id, message, automod.antispam_timeout_seconds)
                .await;
        }
    }
}

async fn apply_spam_timeout(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    message: &serenity::Message,
    timeout_seconds: u64,
) {
    let until_unix = SystemTime::now()
        .checked_add(Duration::from_secs(timeout_seconds))
        .unwrap_or(SystemTime::now())
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs()) as i64;
    let Ok(until) = serenity::Timestamp::from_unix_timestamp(until_unix) else {
        return;
    };

    let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
    if let Err(source) = guild_id.edit_member(&ctx.http, message.author.id, edit).await {
        warn!(?source, "anti-spam timeout failed");
        return;
    }

    let bot_user_id = ctx.cache.current_user().id.get();
    record_case(
        &ctx.http,
        &data.db,
        guild_id,
        NewCase {
            guild_id: guild_id.get(),
            target_user_id: Some(message.author.id.get()),
            moderator_user_id: bot_user_id,
            action: ModAction::Timeout,
            reason: "Anti-spam: message rate exceeded",
            duration_seconds: Some(timeout_seconds),
        },
    )
    .await;

    let _ = message
        .channel_id
        .say(
            &ctx.http,
            format!(
                "<@{}> has been timed out for spamming.",
                message.author.id.get()
            ),
        )
        .await;
}

fn contains_invite_link(content: &str) -> bool {
    let lowered = content.to_lowercase();
    lowered.contains("discord.gg/")
        || lowered.contains("discord.com/invite/")
        || lowered.contains("discordapp.com/invite/")
}

#[cfg(test)]
mod tests {
    use super::contains_invite_link;

    #[test]
    fn invite_links_are_detected() {
        assert!(contains_invite_link("join discord.gg/abc123"));
        assert!(contains_invite_link("HTTPS://DISCORD.COM/INVITE/xyz"));
        assert!(contains_invite_link("discordapp.com/invite/old"));
        assert!(!contains_invite_link("we talk about discord a lot"));
        assert!(!contains_invite_link("plain message"));
    }
}
