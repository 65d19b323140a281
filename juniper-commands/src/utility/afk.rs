use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use juniper_core::{Context, Error};
use juniper_utils::formatting::sanitize_mentions;
use juniper_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "afk",
    aliases: &[],
    desc: "Mark yourself AFK; cleared by your next message.",
    category: "utility",
    usage: "!afk [reason]",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn afk(
    ctx: Context<'_>,
    #[description = "Why you're away"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let reason = reason
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .unwrap_or("AFK")
        .to_owned();

    ctx.data().afk.set(
        guild_id.get(),
        ctx.author().id.get(),
        reason.clone(),
        now_unix_secs(),
    );

    ctx.say(format!("You're now AFK: {}", sanitize_mentions(&reason)))
        .await?;

    Ok(())
}
