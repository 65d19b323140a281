use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use juniper_core::{Context, Error};
use juniper_database::impls::cases::get_case;
use juniper_utils::embed::DEFAULT_EMBED_COLOR;
use juniper_utils::formatting::{
    case_label, format_compact_duration, parse_case_reference, sanitize_mentions,
};
use juniper_utils::permissions::require_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "case",
    aliases: &[],
    desc: "Show a single moderation case.",
    category: "moderation",
    usage: "!case <number>",
    cooldown_secs: 3,
};

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn case(
    ctx: Context<'_>,
    #[description = "Case number (e.g. 12 or #12)"] reference: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !require_user_permission(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        return Ok(());
    }

    let Some(case_number) = reference.as_deref().and_then(parse_case_reference) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(case) = get_case(&ctx.data().db, guild_id.get(), case_number).await? else {
        ctx.say(format!("No case #{case_number} in this server."))
            .await?;
        return Ok(());
    };

    let mut fields = Vec::new();
    fields.push(format!("**Action :** {}", case.action.display_name()));
    if let Some(target_user_id) = case.target_user_id {
        fields.push(format!("**Target :** <@{}>", target_user_id));
    }
    fields.push(format!("**Moderator :** <@{}>", case.moderator_user_id));
    fields.push(format!("**Reason :** {}", sanitize_mentions(&case.reason)));
    if let Some(duration_seconds) = case.duration_seconds {
        fields.push(format!(
            "**Duration :** {}",
            format_compact_duration(duration_seconds)
        ));
    }
    fields.push(format!(
        "**When :** <t:{}:R> • <t:{}:f>",
        case.created_at, case.created_at
    ));

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(case_label(case.case_number))
        .description(fields.join("\n"));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
