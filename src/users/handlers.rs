use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{LoginRequest, NewUser, PublicUser},
        error::{UserError, UserResult},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/sessions", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> UserResult<(StatusCode, Json<PublicUser>)> {
    let user = state.store.register(payload).await.map_err(|e| {
        if let UserError::ValidationFailed(v) = &e {
            warn!(violations = %v, "registration rejected");
        }
        e
    })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> UserResult<Json<PublicUser>> {
    match state
        .store
        .authenticate(&payload.email, &payload.password)
        .await?
    {
        Some(user) => {
            info!(user_id = %user.id, "user logged in");
            Ok(Json(user.into()))
        }
        None => {
            warn!("login failed");
            Err(UserError::InvalidCredentials)
        }
    }
}
