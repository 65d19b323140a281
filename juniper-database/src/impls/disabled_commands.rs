use anyhow::Context as _;

use crate::{
    cache::{CONFIG_CACHE_TTL, invalidate_suppression_rules, suppression_rules_key},
    database::Database,
    impls::now_unix_secs,
    model::disabled::SuppressionRule,
};

/// What a disable/enable request points at.
#[derive(Clone, Copy, Debug)]
pub enum SuppressionTarget<'a> {
    Command(&'a str),
    Category(&'a str),
}

impl<'a> SuppressionTarget<'a> {
    fn command(self) -> Option<&'a str> {
        match self {
            Self::Command(name) => Some(name),
            Self::Category(_) => None,
        }
    }

    fn category(self) -> Option<&'a str> {
        match self {
            Self::Command(_) => None,
            Self::Category(name) => Some(name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisableOutcome {
    Created,
    AlreadyDisabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnableOutcome {
    Removed,
    NotDisabled,
}

/// Create a suppression rule. A duplicate target trips the unique index
/// and reports `AlreadyDisabled` instead of erroring.
pub async fn disable_target(
    db: &Database,
    guild_id: u64,
    channel_id: Option<u64>,
    target: SuppressionTarget<'_>,
    disabled_by: u64,
) -> anyhow::Result<DisableOutcome> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = channel_id
        .map(i64::try_from)
        .transpose()
        .context("channel_id out of i64 range")?;
    let disabled_by_i64 = i64::try_from(disabled_by).context("disabled_by out of i64 range")?;
    let now = i64::try_from(now_unix_secs()).context("now out of i64 range")?;

    let result = sqlx::query(
        "INSERT INTO disabled_commands (guild_id, channel_id, command, category, disabled_by, disabled_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .bind(target.command())
    .bind(target.category())
    .bind(disabled_by_i64)
    .bind(now)
    .execute(db.pool())
    .await;

    match result {
        Ok(_) => {
            invalidate_suppression_rules(db.cache(), guild_id).await?;
            Ok(DisableOutcome::Created)
        }
        Err(sqlx::Error::Database(source)) if source.is_unique_violation() => {
            Ok(DisableOutcome::AlreadyDisabled)
        }
        Err(source) => Err(source.into()),
    }
}

/// Delete-by-filter enable. Matching zero rows is the documented no-op.
pub async fn enable_target(
    db: &Database,
    guild_id: u64,
    channel_id: Option<u64>,
    target: SuppressionTarget<'_>,
) -> anyhow::Result<EnableOutcome> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = channel_id
        .map(i64::try_from)
        .transpose()
        .context("channel_id out of i64 range")?;

    let result = sqlx::query(
        "DELETE FROM disabled_commands
         WHERE guild_id = $1
           AND channel_id IS NOT DISTINCT FROM $2
           AND command IS NOT DISTINCT FROM $3
           AND category IS NOT DISTINCT FROM $4",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .bind(target.command())
    .bind(target.category())
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Ok(EnableOutcome::NotDisabled);
    }

    invalidate_suppression_rules(db.cache(), guild_id).await?;
    Ok(EnableOutcome::Removed)
}

/// All suppression rules for a guild, cache-backed (guard hot path).
pub async fn list_rules(db: &Database, guild_id: u64) -> anyhow::Result<Vec<SuppressionRule>> {
    let cache_key = suppression_rules_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, CONFIG_CACHE_TTL, || async {
            load_rules(db, guild_id).await
        })
        .await
}

async fn load_rules(db: &Database, guild_id: u64) -> anyhow::Result<Vec<SuppressionRule>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    #[derive(sqlx::FromRow)]
    struct RuleRow {
        guild_id: i64,
        channel_id: Option<i64>,
        command: Option<String>,
        category: Option<String>,
        disabled_by: i64,
        disabled_at: i64,
    }

    let rows: Vec<RuleRow> = sqlx::query_as(
        "SELECT guild_id, channel_id, command, category, disabled_by, disabled_at
         FROM disabled_commands
         WHERE guild_id = $1
         ORDER BY disabled_at ASC, id ASC",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(SuppressionRule {
            guild_id: u64::try_from(row.guild_id).context("guild_id row out of u64 range")?,
            channel_id: row
                .channel_id
                .map(u64::try_from)
                .transpose()
                .context("channel_id row out of u64 range")?,
            command: row.command,
            category: row.category,
            disabled_by: u64::try_from(row.disabled_by)
                .context("disabled_by row out of u64 range")?,
            disabled_at: u64::try_from(row.disabled_at)
                .context("disabled_at row out of u64 range")?,
        });
    }

    Ok(out)
}

/// Guard entry point used by the dispatcher.
pub async fn is_command_disabled(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    command: &str,
    category: Option<&str>,
) -> anyhow::Result<bool> {
    let rules = list_rules(db, guild_id).await?;
    Ok(resolve_suppression(&rules, channel_id, command, category))
}

/// Precedence, first hit wins: command in this channel, command
/// guild-wide, category in this channel, category guild-wide. A command
/// without a category skips the category steps.
pub fn resolve_suppression(
    rules: &[SuppressionRule],
    channel_id: u64,
    command: &str,
    category: Option<&str>,
) -> bool {
    if rules
        .iter()
        .any(|rule| rule.channel_id == Some(channel_id) && rule.command.as_deref() == Some(command))
    {
        return true;
    }

    if rules
        .iter()
        .any(|rule| rule.channel_id.is_none() && rule.command.as_deref() == Some(command))
    {
        return true;
    }

    let Some(category) = category else {
        return false;
    };

    if rules.iter().any(|rule| {
        rule.channel_id == Some(channel_id) && rule.category.as_deref() == Some(category)
    }) {
        return true;
    }

    rules
        .iter()
        .any(|rule| rule.channel_id.is_none() && rule.category.as_deref() == Some(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_rule(channel_id: Option<u64>, command: &str) -> SuppressionRule {
        SuppressionRule {
            guild_id: 1,
            channel_id,
            command: Some(command.to_owned()),
            category: None,
            disabled_by: 9,
            disabled_at: 0,
        }
    }

    fn category_rule(channel_id: Option<u64>, category: &str) -> SuppressionRule {
        SuppressionRule {
            guild_id: 1,
            channel_id,
            command: None,
            category: Some(category.to_owned()),
            disabled_by: 9,
            disabled_at: 0,
        }
    }

    #[test]
    fn guild_wide_command_rule_hits_every_channel() {
        let rules = [command_rule(None, "ban")];
        assert!(resolve_suppression(&rules, 100, "ban", Some("moderation")));
        assert!(resolve_suppression(&rules, 200, "ban", Some("moderation")));
        assert!(!resolve_suppression(&rules, 100, "kick", Some("moderation")));
    }

    #[test]
    fn channel_scoped_rules_only_hit_their_channel() {
        let rules = [command_rule(Some(100), "ban"), command_rule(Some(200), "ban")];
        assert!(resolve_suppression(&rules, 100, "ban", None));
        assert!(resolve_suppression(&rules, 200, "ban", None));
        assert!(!resolve_suppression(&rules, 300, "ban", None));
    }

    #[test]
    fn category_rules_cover_member_commands() {
        let rules = [category_rule(None, "moderation")];
        assert!(resolve_suppression(&rules, 100, "ban", Some("moderation")));
        assert!(resolve_suppression(&rules, 100, "kick", Some("moderation")));
        assert!(!resolve_suppression(&rules, 100, "ping", Some("utility")));
    }

    #[test]
    fn channel_scoped_category_rule_only_hits_its_channel() {
        let rules = [category_rule(Some(100), "utility")];
        assert!(resolve_suppression(&rules, 100, "ping", Some("utility")));
        assert!(!resolve_suppression(&rules, 200, "ping", Some("utility")));
    }

    #[test]
    fn uncategorized_commands_skip_category_rules() {
        let rules = [category_rule(None, "moderation")];
        assert!(!resolve_suppression(&rules, 100, "ban", None));
    }

    #[test]
    fn no_rules_means_nothing_is_suppressed() {
        assert!(!resolve_suppression(&[], 100, "ban", Some("moderation")));
    }
}
