use poise::serenity_prelude as serenity;

/// Fixed message shown when the invoker lacks a required permission.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "You don't have permission to use this command.";

/// Resolve the invoking author's effective guild permissions.
///
/// The guild owner always has every permission; everyone else gets the
/// union of their role permissions (including @everyone).
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = serenity::Permissions::empty();
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Permission gate for command bodies: replies with the fixed denial
/// message and returns false when the invoker is missing `required`.
pub async fn require_user_permission<U, E>(
    ctx: poise::Context<'_, U, E>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> anyhow::Result<bool>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if has_user_permission(ctx.http(), guild_id, ctx.author().id, required).await? {
        return Ok(true);
    }

    ctx.say(PERMISSION_DENIED_MESSAGE).await?;
    Ok(false)
}
