use anyhow::Context as _;

use crate::{database::Database, impls::now_unix_secs, model::tags::TagRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagCreateOutcome {
    Created,
    AlreadyExists,
}

pub async fn create_tag(
    db: &Database,
    guild_id: u64,
    name: &str,
    content: &str,
    created_by: u64,
) -> anyhow::Result<TagCreateOutcome> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let created_by_i64 = i64::try_from(created_by).context("created_by out of i64 range")?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let result = sqlx::query(
        "INSERT INTO tags (guild_id, name, content, created_by, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(guild_id_i64)
    .bind(name)
    .bind(content)
    .bind(created_by_i64)
    .bind(now)
    .execute(db.pool())
    .await;

    match result {
        Ok(_) => Ok(TagCreateOutcome::Created),
        Err(sqlx::Error::Database(source)) if source.is_unique_violation() => {
            Ok(TagCreateOutcome::AlreadyExists)
        }
        Err(source) => Err(source.into()),
    }
}

/// Returns false when the tag did not exist.
pub async fn delete_tag(db: &Database, guild_id: u64, name: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let result = sqlx::query("DELETE FROM tags WHERE guild_id = $1 AND name = $2")
        .bind(guild_id_i64)
        .bind(name)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_tag(db: &Database, guild_id: u64, name: &str) -> anyhow::Result<Option<TagRecord>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    #[derive(sqlx::FromRow)]
    struct TagRow {
        name: String,
        content: String,
        created_by: i64,
        created_at: i64,
    }

    let row: Option<TagRow> = sqlx::query_as(
        "SELECT name, content, created_by, created_at
         FROM tags
         WHERE guild_id = $1 AND name = $2",
    )
    .bind(guild_id_i64)
    .bind(name)
    .fetch_optional(db.pool())
    .await?;

    row.map(|row| {
        Ok(TagRecord {
            name: row.name,
            content: row.content,
            created_by: u64::try_from(row.created_by)
                .context("created_by row out of u64 range")?,
            created_at: u64::try_from(row.created_at)
                .context("created_at row out of u64 range")?,
        })
    })
    .transpose()
}

pub async fn list_tag_names(db: &Database, guild_id: u64) -> anyhow::Result<Vec<String>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM tags WHERE guild_id = $1 ORDER BY name ASC")
            .bind(guild_id_i64)
            .fetch_all(db.pool())
            .await?;

    Ok(names)
}
