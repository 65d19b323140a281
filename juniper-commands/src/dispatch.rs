use std::time::Duration;

use tracing::error;

use juniper_core::cooldown::{CooldownGate, DEFAULT_COOLDOWN_SECS};
use juniper_core::{Context, Error};
use juniper_database::impls::disabled_commands::is_command_disabled;

use crate::find_meta;

/// Commands that manage the suppression list itself. They always bypass
/// the Disable-List Guard, otherwise a guild could lock itself out with no
/// way back.
pub const GUARD_EXEMPT_COMMANDS: &[&str] = &["disable", "enable", "disabledlist"];

pub const COMMAND_DISABLED_MESSAGE: &str = "This command is disabled here.";

/// Global pre-command gate. poise runs this for prefix and slash
/// invocations alike, which is what keeps the two transports on one
/// dispatch policy.
///
/// Order matters: the suppression check runs before the cooldown check so
/// a disabled command never consumes the user's cooldown. A failed rule
/// lookup fails open (command runs, error logged) — suppression is a
/// convenience, not a security boundary.
pub async fn pre_command_gate(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        // DMs have no guild configuration to consult.
        return Ok(true);
    };

    let command_name = ctx.command().name.clone();
    let meta = find_meta(&command_name);

    if !GUARD_EXEMPT_COMMANDS.contains(&command_name.as_str()) {
        let category = meta.map(|meta| meta.category);
        match is_command_disabled(
            &ctx.data().db,
            guild_id.get(),
            ctx.channel_id().get(),
            &command_name,
            category,
        )
        .await
        {
            Ok(true) => {
                ctx.say(COMMAND_DISABLED_MESSAGE).await?;
                return Ok(false);
            }
            Ok(false) => {}
            Err(source) => {
                error!(
                    ?source,
                    command = %command_name,
                    "suppression lookup failed; running the command"
                );
            }
        }
    }

    let cooldown_secs = meta.map_or(DEFAULT_COOLDOWN_SECS, |meta| meta.cooldown_secs);
    if cooldown_secs > 0 {
        let gate = ctx.data().cooldowns.try_acquire(
            &command_name,
            ctx.author().id.get(),
            Duration::from_secs(cooldown_secs),
        );

        if let CooldownGate::Throttled { retry_after } = gate {
            ctx.say(format!(
                "You're doing that too fast. Try again in {:.1}s.",
                retry_after.as_secs_f64()
            ))
            .await?;
            return Ok(false);
        }
    }

    Ok(true)
}
