use anyhow::Context as _;

use crate::{database::Database, model::reaction_roles::ReactionRoleBinding};

/// Returns false when the (message, emoji) pair is already bound.
pub async fn add_binding(db: &Database, binding: &ReactionRoleBinding) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(binding.guild_id).context("guild_id out of i64 range")?;
    let message_id_i64 = i64::try_from(binding.message_id).context("message_id out of i64 range")?;
    let role_id_i64 = i64::try_from(binding.role_id).context("role_id out of i64 range")?;

    let result = sqlx::query(
        "INSERT INTO reaction_roles (guild_id, message_id, emoji, role_id)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(guild_id_i64)
    .bind(message_id_i64)
    .bind(&binding.emoji)
    .bind(role_id_i64)
    .execute(db.pool())
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(source)) if source.is_unique_violation() => Ok(false),
        Err(source) => Err(source.into()),
    }
}

/// Returns false when no binding matched.
pub async fn remove_binding(
    db: &Database,
    guild_id: u64,
    message_id: u64,
    emoji: &str,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let message_id_i64 = i64::try_from(message_id).context("message_id out of i64 range")?;

    let result = sqlx::query(
        "DELETE FROM reaction_roles WHERE guild_id = $1 AND message_id = $2 AND emoji = $3",
    )
    .bind(guild_id_i64)
    .bind(message_id_i64)
    .bind(emoji)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Resolve the role bound to an emoji on a message, if any.
pub async fn find_binding(
    db: &Database,
    guild_id: u64,
    message_id: u64,
    emoji: &str,
) -> anyhow::Result<Option<u64>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let message_id_i64 = i64::try_from(message_id).context("message_id out of i64 range")?;

    let role_id: Option<i64> = sqlx::query_scalar(
        "SELECT role_id FROM reaction_roles WHERE guild_id = $1 AND message_id = $2 AND emoji = $3",
    )
    .bind(guild_id_i64)
    .bind(message_id_i64)
    .bind(emoji)
    .fetch_optional(db.pool())
    .await?;

    role_id
        .map(u64::try_from)
        .transpose()
        .context("role_id row out of u64 range")
}

pub async fn list_bindings(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<Vec<ReactionRoleBinding>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    #[derive(sqlx::FromRow)]
    struct BindingRow {
        guild_id: i64,
        message_id: i64,
        emoji: String,
        role_id: i64,
    }

    let rows: Vec<BindingRow> = sqlx::query_as(
        "SELECT guild_id, message_id, emoji, role_id
         FROM reaction_roles
         WHERE guild_id = $1
         ORDER BY message_id ASC, emoji ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(ReactionRoleBinding {
            guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
            message_id: u64::try_from(row.message_id)
                .context("message_id row out of u64 range")?,
            emoji: row.emoji,
            role_id: u64::try_from(row.role_id).context("role_id row out of u64 range")?,
        });
    }

    Ok(out)
}
