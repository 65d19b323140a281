use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{error, warn};

use juniper_core::Data;
use juniper_database::impls::guild_settings::get_guild_settings;
use juniper_utils::embed::notice_embed;
use juniper_utils::template::{DEFAULT_WELCOME_TEMPLATE, render_member_template};

const RAID_JOIN_WINDOW: Duration = Duration::from_secs(60);
const RAID_JOIN_THRESHOLD: u32 = 10;

/// Welcome message, auto-roles, and the join-rate anti-raid check.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) {
    let guild_id = member.guild_id;

    let settings = match get_guild_settings(&data.db, guild_id.get()).await {
        Ok(settings) => settings,
        Err(source) => {
            error!(?source, "failed to read guild settings on member join");
            return;
        }
    };

    let autorole = if member.user.bot {
        settings.bot_autorole_id
    } else {
        settings.human_autorole_id
    };
    if let Some(role_id) = autorole
        && let Err(source) = member
            .add_role(&ctx.http, serenity::RoleId::new(role_id))
            .await
    {
        warn!(?source, role_id, "auto-role assignment failed");
    }

    if !member.user.bot
        && let Some(channel_id) = settings.welcome_channel_id
    {
        let template = settings
            .welcome_template
            .as_deref()
            .unwrap_or(DEFAULT_WELCOME_TEMPLATE);
        let guild_name = match guild_id.to_partial_guild(&ctx.http).await {
            Ok(guild) => guild.name,
            Err(_) => "this server".to_owned(),
        };
        let text = render_member_template(template, member.user.id.get(), &guild_name);

        if let Err(source) = serenity::ChannelId::new(channel_id).say(&ctx.http, text).await {
            warn!(?source, "welcome message send failed");
        }
    }

    // Bots count toward the join rate too; raids often add both.
    let joins = data.join_rate.record(guild_id.get(), RAID_JOIN_WINDOW);
    if joins >= RAID_JOIN_THRESHOLD {
        data.join_rate.reset(guild_id.get());

        let Some(log_channel_id) = settings.log_channel_id else {
            return;
        };

        let embed = notice_embed(
            "Possible raid",
            format!(
                "{RAID_JOIN_THRESHOLD}+ members joined within {}s. Latest: <@{}>.",
                RAID_JOIN_WINDOW.as_secs(),
                member.user.id.get()
            ),
        );
        if let Err(source) = serenity::ChannelId::new(log_channel_id)
            .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
            .await
        {
            warn!(?source, "raid alert send failed");
        }
    }
}
