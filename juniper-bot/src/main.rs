mod events;
mod tasks;

use std::collections::HashSet;
use std::env;
use std::net::SocketAddr;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use juniper_commands::{dispatch, find_meta, similar_commands};
use juniper_core::afk::AfkRegistry;
use juniper_core::cooldown::CooldownTracker;
use juniper_core::giveaway::GiveawayRegistry;
use juniper_core::ratewindow::{JoinRateTracker, MessageRateTracker};
use juniper_core::{Data, Error};
use juniper_database::impls::guild_settings::{get_guild_settings, get_log_channel_id};
use juniper_database::{CacheService, Database, MIGRATOR};
use juniper_utils::embed::notice_embed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let database_url = env::var("DATABASE_URL")?;
    let default_prefix = env::var("COMMAND_PREFIX")
        .unwrap_or_else(|_| juniper_utils::DEFAULT_COMMAND_PREFIX.to_owned());
    let owner_id = match env::var("OWNER_ID") {
        Ok(raw) => Some(raw.trim().parse::<u64>()?),
        Err(_) => None,
    };

    // A duplicate name or alias would silently shadow a command; refuse to
    // start instead.
    juniper_commands::validate_registry()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "juniper:prod".to_owned());

    let cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let db = Database::with_cache(db_pool, cache);

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    tasks::spawn_case_retention_sweep(db.clone());

    if let Ok(addr_raw) = env::var("DASHBOARD_ADDR") {
        let addr: SocketAddr = addr_raw.trim().parse()?;
        let api_db = db.clone();
        let api_token = env::var("DASHBOARD_TOKEN").ok().filter(|t| !t.is_empty());
        if api_token.is_none() {
            warn!("DASHBOARD_TOKEN is not set; the dashboard API is unauthenticated.");
        }
        tokio::spawn(async move {
            if let Err(source) = juniper_api::serve(addr, api_db, api_token).await {
                error!(?source, "dashboard API server exited");
            }
        });
        info!(%addr, "Dashboard API listening.");
    }

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut owners = HashSet::new();
    if let Some(owner_id) = owner_id {
        owners.insert(serenity::UserId::new(owner_id));
    }

    let data = Data {
        db,
        default_prefix: default_prefix.clone(),
        cooldowns: CooldownTracker::new(),
        giveaways: GiveawayRegistry::new(),
        message_rate: MessageRateTracker::new(),
        join_rate: JoinRateTracker::new(),
        afk: AfkRegistry::new(),
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: juniper_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            command_check: Some(|ctx| Box::pin(dispatch::pre_command_gate(ctx))),
            owners,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(default_prefix),
                dynamic_prefix: Some(|ctx| Box::pin(resolve_dynamic_prefix(ctx))),
                mention_as_prefix: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let data = data.clone();
            Box::pin(async move {
                info!("Juniper has awoken!");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                Ok(data)
            })
        })
        .build();

    info!("Juniper is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Per-guild prefix, falling back to the process default. Lookup failures
/// fall back too; a broken database should not make the bot deaf.
async fn resolve_dynamic_prefix(
    ctx: poise::PartialContext<'_, Data, Error>,
) -> Result<Option<String>, Error> {
    let Some(guild_id) = ctx.guild_id else {
        return Ok(Some(ctx.data.default_prefix.clone()));
    };

    match get_guild_settings(&ctx.data.db, guild_id.get()).await {
        Ok(settings) => Ok(Some(
            settings
                .prefix
                .unwrap_or_else(|| ctx.data.default_prefix.clone()),
        )),
        Err(source) => {
            error!(?source, "prefix lookup failed; using the default prefix");
            Ok(Some(ctx.data.default_prefix.clone()))
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                ?error,
                command = %ctx.command().qualified_name,
                "command error"
            );

            let embed = notice_embed(
                "Command Error",
                "Something went wrong while running this command.",
            );
            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;

            report_error_to_log_channel(&ctx, &error).await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = find_meta(&ctx.command().name)
                .map(|meta| format!("Usage: `{}`", meta.usage))
                .unwrap_or_else(|| format!("Usage: `{}`", ctx.command().qualified_name));
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand {
            ctx, msg, msg_content, ..
        } => {
            let input = msg_content.split_whitespace().next().unwrap_or("");
            if input.is_empty() {
                debug!("bare prefix invocation");
                return;
            }

            let suggestions = similar_commands(input);
            let text = if suggestions.is_empty() {
                format!("Unknown command: `{input}`.")
            } else {
                format!(
                    "Unknown command: `{input}`. Did you mean: {}?",
                    suggestions
                        .iter()
                        .map(|name| format!("`{name}`"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };

            let _ = msg.channel_id.say(&ctx.http, text).await;
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

/// Structured error report for the guild's log channel, when one is
/// configured.
async fn report_error_to_log_channel(ctx: &juniper_core::Context<'_>, error: &Error) {
    let Some(guild_id) = ctx.guild_id() else {
        return;
    };

    let channel_id = match get_log_channel_id(&ctx.data().db, guild_id.get()).await {
        Ok(Some(channel_id)) => channel_id,
        Ok(None) => return,
        Err(source) => {
            error!(?source, "failed to read log channel for error report");
            return;
        }
    };

    let details: String = format!("{error:#}").chars().take(1000).collect();
    let embed = notice_embed(
        "Command Error",
        format!(
            "**Command :** {}\n**User :** <@{}>\n**Channel :** <#{}>\n**Error :** {}",
            ctx.command().qualified_name,
            ctx.author().id.get(),
            ctx.channel_id().get(),
            details
        ),
    );

    let _ = serenity::ChannelId::new(channel_id)
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await;
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::member_join::handle_member_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::Message { new_message } => {
            events::message::handle_message(ctx, data, new_message).await;
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            events::reactions::handle_reaction_add(ctx, data, add_reaction).await;
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            events::reactions::handle_reaction_remove(ctx, data, removed_reaction).await;
        }
        _ => {}
    }

    Ok(())
}
