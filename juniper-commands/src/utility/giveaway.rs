use std::time::Duration;

use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::giveaway::{ConcludeOutcome, Giveaway};
use juniper_core::{Context, Error};
use juniper_utils::embed::DEFAULT_EMBED_COLOR;
use juniper_utils::formatting::sanitize_mentions;
use juniper_utils::parse::parse_duration_seconds;
use juniper_utils::permissions::require_user_permission;
use juniper_utils::time::now_unix_secs;

pub const GSTART_META: CommandMeta = CommandMeta {
    name: "gstart",
    aliases: &["giveaway"],
    desc: "Start a giveaway in this channel.",
    category: "utility",
    usage: "!gstart <duration> <winners> <prize...>",
    cooldown_secs: 10,
};

pub const GEND_META: CommandMeta = CommandMeta {
    name: "gend",
    aliases: &[],
    desc: "End a running giveaway early.",
    category: "utility",
    usage: "!gend <message_id>",
    cooldown_secs: 3,
};

pub const GREROLL_META: CommandMeta = CommandMeta {
    name: "greroll",
    aliases: &[],
    desc: "Redraw a winner for a finished giveaway.",
    category: "utility",
    usage: "!greroll <message_id>",
    cooldown_secs: 3,
};

pub const GIVEAWAY_REACTION: &str = "🎉";

const MAX_WINNERS: u32 = 20;
const MAX_DURATION_SECS: u64 = 14 * 24 * 60 * 60;

#[poise::command(prefix_command, slash_command, aliases("giveaway"), category = "Utility")]
pub async fn gstart(
    ctx: Context<'_>,
    #[description = "How long it runs (e.g. 1h, 2d)"] duration: Option<String>,
    #[description = "Number of winners"] winners: Option<u32>,
    #[description = "The prize"]
    #[rest]
    prize: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let duration_secs = duration.as_deref().and_then(parse_duration_seconds);
    let prize = prize
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty());

    let (Some(duration_secs), Some(winners), Some(prize)) = (duration_secs, winners, prize) else {
        ctx.say(usage_message(GSTART_META.usage)).await?;
        return Ok(());
    };

    if duration_secs > MAX_DURATION_SECS {
        ctx.say("Giveaways can run for at most 14 days.").await?;
        return Ok(());
    }
    let winners = winners.clamp(1, MAX_WINNERS);

    let ends_at_unix = now_unix_secs() + duration_secs;
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("🎉 {}", sanitize_mentions(prize)))
        .description(format!(
            "React with {} to enter!\n**Winners :** {}\n**Ends :** <t:{}:R>\n**Hosted by :** <@{}>",
            GIVEAWAY_REACTION,
            winners,
            ends_at_unix,
            ctx.author().id.get()
        ));

    let reply = ctx.send(poise::CreateReply::default().embed(embed)).await?;
    let message = reply.message().await?;
    let message_id = message.id.get();
    let channel_id = message.channel_id;

    if let Err(source) = message
        .react(
            ctx.http(),
            serenity::ReactionType::Unicode(GIVEAWAY_REACTION.to_owned()),
        )
        .await
    {
        error!(?source, "failed to seed the giveaway reaction");
    }

    ctx.data().giveaways.insert(
        message_id,
        Giveaway::new(
            guild_id.get(),
            channel_id.get(),
            ctx.author().id.get(),
            prize.to_owned(),
            winners,
            ends_at_unix,
        ),
    );

    // The timer is not cancellable; conclude() is idempotent, so if `gend`
    // beats this task the late firing is a no-op. Giveaways do not survive
    // a restart.
    let registry = ctx.data().giveaways.clone();
    let http = ctx.serenity_context().http.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(duration_secs)).await;

        let outcome = {
            let mut rng = rand::rng();
            registry.conclude(message_id, &mut rng)
        };

        if let ConcludeOutcome::Finished { prize, winners, .. } = outcome {
            let announcement = winners_line(&prize, &winners);
            if let Err(source) = channel_id.say(&http, announcement).await {
                error!(?source, "failed to announce giveaway result");
            }
        }
    });

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn gend(
    ctx: Context<'_>,
    #[description = "Giveaway message id"] message_id: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let Some(message_id) = message_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
    else {
        ctx.say(usage_message(GEND_META.usage)).await?;
        return Ok(());
    };

    let outcome = {
        let mut rng = rand::rng();
        ctx.data().giveaways.conclude(message_id, &mut rng)
    };

    match outcome {
        ConcludeOutcome::NotFound => {
            ctx.say("No running giveaway with that message id.").await?;
        }
        ConcludeOutcome::AlreadyConcluded => {
            ctx.say("That giveaway already ended.").await?;
        }
        ConcludeOutcome::Finished { prize, winners, .. } => {
            ctx.say(winners_line(&prize, &winners)).await?;
        }
    }

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn greroll(
    ctx: Context<'_>,
    #[description = "Giveaway message id"] message_id: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let Some(message_id) = message_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
    else {
        ctx.say(usage_message(GREROLL_META.usage)).await?;
        return Ok(());
    };

    let rerolled = {
        let mut rng = rand::rng();
        ctx.data().giveaways.reroll(message_id, 1, &mut rng)
    };

    match rerolled {
        None => {
            ctx.say("No finished giveaway with that message id.").await?;
        }
        Some(winners) if winners.is_empty() => {
            ctx.say("That giveaway had no entries to draw from.").await?;
        }
        Some(winners) => {
            let Some(giveaway) = ctx.data().giveaways.get(message_id) else {
                return Ok(());
            };
            ctx.say(format!(
                "🎉 New winner for **{}**: <@{}>!",
                sanitize_mentions(&giveaway.prize),
                winners[0]
            ))
            .await?;
        }
    }

    Ok(())
}

/// Giveaway result line; an empty winner list is a normal outcome, not an
/// error.
fn winners_line(prize: &str, winners: &[u64]) -> String {
    let prize = sanitize_mentions(prize);
    if winners.is_empty() {
        format!("🎉 The giveaway for **{prize}** ended with no valid entries, so there are no winners.")
    } else {
        let mentions = winners
            .iter()
            .map(|id| format!("<@{id}>"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("🎉 Congratulations {mentions}! You won **{prize}**!")
    }
}

#[cfg(test)]
mod tests {
    use super::winners_line;

    #[test]
    fn zero_winner_conclusions_have_their_own_line() {
        let line = winners_line("Nitro", &[]);
        assert!(line.contains("no winners"));
    }

    #[test]
    fn winners_are_mentioned() {
        let line = winners_line("Nitro", &[1, 2]);
        assert!(line.contains("<@1>"));
        assert!(line.contains("<@2>"));
    }
}
