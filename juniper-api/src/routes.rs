use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use juniper_database::impls::cases::{CaseFilters, list_recent_cases};
use juniper_database::impls::guild_settings::{get_guild_settings, save_guild_settings};
use juniper_database::impls::reaction_roles::list_bindings;
use juniper_database::model::cases::CaseRecord;
use juniper_database::model::reaction_roles::ReactionRoleBinding;
use juniper_database::model::settings::GuildSettings;

use crate::AppState;
use crate::error::ApiError;

/// The settings aggregate as the dashboard sees it: the editable row plus
/// the read-only reaction-role bindings.
#[derive(Serialize)]
pub struct GuildSettingsResponse {
    #[serde(flatten)]
    pub settings: GuildSettings,
    pub reaction_roles: Vec<ReactionRoleBinding>,
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
) -> Result<Json<GuildSettingsResponse>, ApiError> {
    let settings = get_guild_settings(&state.db, guild_id).await?;
    let reaction_roles = list_bindings(&state.db, guild_id).await?;

    Ok(Json(GuildSettingsResponse {
        settings,
        reaction_roles,
    }))
}

/// Full-aggregate upsert. The path's guild id always wins over whatever
/// the body claims; the save invalidates the bot's cached copy so command
/// handlers see the change on their next read.
pub async fn put_settings(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    Json(mut settings): Json<GuildSettings>,
) -> Result<Json<GuildSettings>, ApiError> {
    settings.guild_id = guild_id;
    save_guild_settings(&state.db, &settings).await?;

    Ok(Json(settings))
}

#[derive(Deserialize)]
pub struct CasesQuery {
    pub limit: Option<u32>,
}

pub async fn get_cases(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    Query(query): Query<CasesQuery>,
) -> Result<Json<Vec<CaseRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let cases = list_recent_cases(
        &state.db,
        guild_id,
        CaseFilters {
            target_user_id: None,
            moderator_user_id: None,
            action: None,
            limit,
        },
    )
    .await?;

    Ok(Json(cases))
}
