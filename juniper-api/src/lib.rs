mod error;
mod routes;

use std::net::SocketAddr;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::info;

use juniper_database::Database;

use crate::error::ApiError;

/// Shared state for the dashboard API. It deliberately carries the same
/// `Database` handle the command handlers use, so both writers edit the
/// same persisted settings.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    bearer_token: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/guilds/{guild_id}/settings",
            get(routes::get_settings).put(routes::put_settings),
        )
        .route("/guilds/{guild_id}/cases", get(routes::get_cases))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/healthz", get(routes::healthz))
        .nest("/api", api)
        .with_state(state)
}

/// Serve the dashboard API until the process exits.
pub async fn serve(
    addr: SocketAddr,
    db: Database,
    bearer_token: Option<String>,
) -> anyhow::Result<()> {
    let state = AppState { db, bearer_token };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "dashboard API bound");
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Static bearer-token gate for every `/api` route. With no token
/// configured the gate is open (local development).
async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.bearer_token.as_deref() {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        if provided != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
