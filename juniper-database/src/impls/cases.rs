use anyhow::Context as _;

use crate::{
    database::Database,
    impls::now_unix_secs,
    model::cases::{CaseRecord, ModAction},
};

/// How long a case stays on record before the retention sweep removes it.
pub const CASE_RETENTION_SECS: u64 = 30 * 24 * 60 * 60;

pub struct NewCase<'a> {
    pub guild_id: u64,
    pub target_user_id: Option<u64>,
    pub moderator_user_id: u64,
    pub action: ModAction,
    pub reason: &'a str,
    pub duration_seconds: Option<u64>,
}

pub struct CaseFilters<'a> {
    pub target_user_id: Option<u64>,
    pub moderator_user_id: Option<u64>,
    pub action: Option<&'a str>,
    pub limit: u32,
}

#[derive(sqlx::FromRow)]
struct CaseRow {
    case_number: i64,
    guild_id: i64,
    target_user_id: Option<i64>,
    moderator_user_id: i64,
    action: String,
    reason: String,
    duration_seconds: Option<i64>,
    created_at: i64,
}

/// Append a case with the next per-guild number.
///
/// The advisory lock serializes the MAX+1 read with the insert for this
/// guild, so two overlapping moderation actions cannot draw the same
/// number; unrelated guilds proceed in parallel. The `(guild_id,
/// case_number)` unique constraint backstops the lock.
pub async fn create_case(db: &Database, new_case: NewCase<'_>) -> anyhow::Result<CaseRecord> {
    let guild_id_i64 = i64::try_from(new_case.guild_id).context("guild_id out of i64 range")?;
    let target_user_id_i64 = new_case
        .target_user_id
        .map(i64::try_from)
        .transpose()
        .context("target_user_id out of i64 range")?;
    let moderator_user_id_i64 =
        i64::try_from(new_case.moderator_user_id).context("moderator_user_id out of i64 range")?;
    let duration_seconds_i64 = new_case
        .duration_seconds
        .map(i64::try_from)
        .transpose()
        .context("duration_seconds out of i64 range")?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let mut tx = db.pool().begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(guild_id_i64)
        .execute(&mut *tx)
        .await?;

    let next_case_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(case_number), 0) + 1 FROM mod_cases WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_one(&mut *tx)
    .await?;

    let row: CaseRow = sqlx::query_as(
        "INSERT INTO mod_cases (
            guild_id,
            case_number,
            target_user_id,
            moderator_user_id,
            action,
            reason,
            duration_seconds,
            created_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING case_number, guild_id, target_user_id, moderator_user_id, action, reason, duration_seconds, created_at",
    )
    .bind(guild_id_i64)
    .bind(next_case_number)
    .bind(target_user_id_i64)
    .bind(moderator_user_id_i64)
    .bind(new_case.action.as_str())
    .bind(new_case.reason)
    .bind(duration_seconds_i64)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    to_case_record(row)
}

pub async fn list_recent_cases(
    db: &Database,
    guild_id: u64,
    filters: CaseFilters<'_>,
) -> anyhow::Result<Vec<CaseRecord>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let target_user_id_i64 = filters
        .target_user_id
        .map(i64::try_from)
        .transpose()
        .context("target_user_id out of i64 range")?;
    let moderator_user_id_i64 = filters
        .moderator_user_id
        .map(i64::try_from)
        .transpose()
        .context("moderator_user_id out of i64 range")?;
    let limit_i64 = i64::from(filters.limit.clamp(1, 200));

    let rows: Vec<CaseRow> = sqlx::query_as(
        "SELECT case_number, guild_id, target_user_id, moderator_user_id, action, reason, duration_seconds, created_at
         FROM mod_cases
         WHERE guild_id = $1
           AND ($2::BIGINT IS NULL OR target_user_id = $2)
           AND ($3::BIGINT IS NULL OR moderator_user_id = $3)
           AND ($4::TEXT IS NULL OR LOWER(action) = LOWER($4))
         ORDER BY case_number DESC
         LIMIT $5",
    )
    .bind(guild_id_i64)
    .bind(target_user_id_i64)
    .bind(moderator_user_id_i64)
    .bind(filters.action)
    .bind(limit_i64)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_case_record).collect()
}

pub async fn get_case(
    db: &Database,
    guild_id: u64,
    case_number: u64,
) -> anyhow::Result<Option<CaseRecord>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let case_number_i64 = i64::try_from(case_number).context("case_number out of i64 range")?;

    let row: Option<CaseRow> = sqlx::query_as(
        "SELECT case_number, guild_id, target_user_id, moderator_user_id, action, reason, duration_seconds, created_at
         FROM mod_cases
         WHERE guild_id = $1 AND case_number = $2",
    )
    .bind(guild_id_i64)
    .bind(case_number_i64)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_case_record).transpose()
}

/// Retention sweep: drop every case created before the cutoff, across all
/// guilds. Returns the number of rows removed.
pub async fn delete_cases_before(db: &Database, cutoff_unix: u64) -> anyhow::Result<u64> {
    let cutoff_i64 = i64::try_from(cutoff_unix).context("cutoff out of i64 range")?;

    let result = sqlx::query("DELETE FROM mod_cases WHERE created_at < $1")
        .bind(cutoff_i64)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected())
}

fn to_case_record(row: CaseRow) -> anyhow::Result<CaseRecord> {
    Ok(CaseRecord {
        case_number: u64::try_from(row.case_number).context("case_number out of u64 range")?,
        guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
        target_user_id: row
            .target_user_id
            .map(u64::try_from)
            .transpose()
            .context("target_user_id row out of u64 range")?,
        moderator_user_id: u64::try_from(row.moderator_user_id)
            .context("moderator_user_id row out of u64 range")?,
        action: ModAction::parse(&row.action),
        reason: row.reason,
        duration_seconds: row
            .duration_seconds
            .map(u64::try_from)
            .transpose()
            .context("duration_seconds row out of u64 range")?,
        created_at: u64::try_from(row.created_at).context("created_at row out of u64 range")?,
    })
}
