//! User API endpoints.

use api_types::user::{UserCreate, UserUpdate, UserView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, auth::Principal, server::ServerState};

fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
    }
}

/// Handles `POST /users` (public).
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let (Some(username), Some(email), Some(password)) =
        (payload.username, payload.email, payload.password)
    else {
        return Err(ServerError::Generic("missing required fields".to_string()));
    };

    let user = state
        .engine
        .create_user(engine::UserDraft {
            username,
            email,
            password,
        })
        .await?;

    tracing::info!("user {} registered", user.username);
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(user_id, &principal.key()).await?;
    Ok(Json(map_user(user)))
}

pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_user(
            user_id,
            &principal.key(),
            engine::UserPatch {
                username: payload.username,
                email: payload.email,
            },
        )
        .await?;
    Ok(Json(map_user(user)))
}

pub async fn delete(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(user_id, &principal.key()).await?;
    tracing::info!("user {user_id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
