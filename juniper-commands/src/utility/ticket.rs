use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};

pub const TICKET_META: CommandMeta = CommandMeta {
    name: "ticket",
    aliases: &[],
    desc: "Open a private support channel with the moderators.",
    category: "utility",
    usage: "!ticket [topic]",
    cooldown_secs: 60,
};

pub const CLOSETICKET_META: CommandMeta = CommandMeta {
    name: "closeticket",
    aliases: &[],
    desc: "Close the current ticket channel.",
    category: "utility",
    usage: "!closeticket",
    cooldown_secs: 5,
};

const TICKET_CHANNEL_PREFIX: &str = "ticket-";

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ticket(
    ctx: Context<'_>,
    #[description = "What the ticket is about"]
    #[rest]
    topic: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let author = ctx.author();
    let channel_name = ticket_channel_name(&author.name);

    // Visible only to the opener; moderators see it through the
    // Administrator override.
    let everyone_role = serenity::RoleId::new(guild_id.get());
    let overwrites = vec![
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(everyone_role),
        },
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(author.id),
        },
    ];

    let mut builder = serenity::CreateChannel::new(channel_name)
        .kind(serenity::ChannelType::Text)
        .permissions(overwrites);
    if let Some(topic) = topic
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        builder = builder.topic(topic);
    }

    let channel = match guild_id.create_channel(ctx.http(), builder).await {
        Ok(channel) => channel,
        Err(source) => {
            error!(?source, "ticket channel creation failed");
            ctx.say("I couldn't open a ticket channel. Check my permissions.")
                .await?;
            return Ok(());
        }
    };

    let _ = channel
        .say(
            ctx.http(),
            format!(
                "<@{}> opened this ticket. A moderator will be with you; close it with `closeticket`.",
                author.id.get()
            ),
        )
        .await;

    ctx.say(format!("Ticket opened: <#{}>", channel.id.get()))
        .await?;

    Ok(())
}

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn closeticket(ctx: Context<'_>) -> Result<(), Error> {
    let Some(_guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let channel = match ctx.channel_id().to_channel(ctx.http()).await {
        Ok(channel) => channel.guild(),
        Err(source) => {
            error!(?source, "channel lookup for closeticket failed");
            None
        }
    };
    let Some(channel) = channel else {
        ctx.say("I couldn't resolve this channel.").await?;
        return Ok(());
    };

    if !channel.name.starts_with(TICKET_CHANNEL_PREFIX) {
        ctx.say("This isn't a ticket channel.").await?;
        return Ok(());
    }

    ctx.say("Closing this ticket.").await?;
    if let Err(source) = channel.delete(ctx.http()).await {
        error!(?source, "ticket channel deletion failed");
        ctx.say("I couldn't delete this channel. Check my permissions.")
            .await?;
    }

    Ok(())
}

/// Channel names must be lowercase and dash-separated; fold everything
/// else out of the opener's name.
fn ticket_channel_name(author_name: &str) -> String {
    let cleaned: String = author_name
        .chars()
        .filter_map(|ch| {
            if ch.is_ascii_alphanumeric() {
                Some(ch.to_ascii_lowercase())
            } else if ch == '-' || ch == '_' || ch == ' ' {
                Some('-')
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        format!("{TICKET_CHANNEL_PREFIX}user")
    } else {
        format!("{TICKET_CHANNEL_PREFIX}{cleaned}")
    }
}

#[cfg(test)]
mod tests {
    use super::ticket_channel_name;

    #[test]
    fn ticket_names_are_channel_safe() {
        assert_eq!(ticket_channel_name("Maya"), "ticket-maya");
        assert_eq!(ticket_channel_name("mod man"), "ticket-mod-man");
        assert_eq!(ticket_channel_name("🔥🔥"), "ticket-user");
        assert_eq!(ticket_channel_name("--x--"), "ticket-x");
    }
}
