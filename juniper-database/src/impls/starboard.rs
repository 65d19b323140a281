use anyhow::Context as _;

use crate::database::Database;

pub struct StarboardPost {
    pub post_message_id: u64,
    pub star_count: u32,
}

pub async fn get_post(
    db: &Database,
    guild_id: u64,
    source_message_id: u64,
) -> anyhow::Result<Option<StarboardPost>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let source_message_id_i64 =
        i64::try_from(source_message_id).context("source_message_id out of i64 range")?;

    let row: Option<(i64, i32)> = sqlx::query_as(
        "SELECT post_message_id, star_count
         FROM starboard_posts
         WHERE guild_id = $1 AND source_message_id = $2",
    )
    .bind(guild_id_i64)
    .bind(source_message_id_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(|(post_message_id, star_count)| {
        Ok(StarboardPost {
            post_message_id: u64::try_from(post_message_id)
                .context("post_message_id row out of u64 range")?,
            star_count: u32::try_from(star_count).context("star_count row out of u32 range")?,
        })
    })
    .transpose()
}

/// Record a freshly posted starboard entry. The unique constraint on the
/// source message makes a concurrent double-post fail loudly instead of
/// duplicating.
pub async fn insert_post(
    db: &Database,
    guild_id: u64,
    source_message_id: u64,
    post_message_id: u64,
    star_count: u32,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let source_message_id_i64 =
        i64::try_from(source_message_id).context("source_message_id out of i64 range")?;
    let post_message_id_i64 =
        i64::try_from(post_message_id).context("post_message_id out of i64 range")?;
    let star_count_i32 = i32::try_from(star_count).context("star_count out of i32 range")?;

    sqlx::query(
        "INSERT INTO starboard_posts (guild_id, source_message_id, post_message_id, star_count)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(guild_id_i64)
    .bind(source_message_id_i64)
    .bind(post_message_id_i64)
    .bind(star_count_i32)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn update_star_count(
    db: &Database,
    guild_id: u64,
    source_message_id: u64,
    star_count: u32,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let source_message_id_i64 =
        i64::try_from(source_message_id).context("source_message_id out of i64 range")?;
    let star_count_i32 = i32::try_from(star_count).context("star_count out of i32 range")?;

    sqlx::query(
        "UPDATE starboard_posts
         SET star_count = $1
         WHERE guild_id = $2 AND source_message_id = $3",
    )
    .bind(star_count_i32)
    .bind(guild_id_i64)
    .bind(source_message_id_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}
