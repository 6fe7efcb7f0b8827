//! Account API endpoints.

use api_types::account::{AccountCreate, AccountListResponse, AccountUpdate, AccountView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, auth::Principal, server::ServerState};

fn map_account(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        account_number: account.account_number,
        kind: account.kind,
        balance_minor: account.balance_minor,
        user_id: account.user_id,
    }
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountCreate>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let Some(kind) = payload.kind else {
        return Err(ServerError::Generic("account type required".to_string()));
    };

    let account = state
        .engine
        .create_account(
            principal.id,
            engine::AccountDraft {
                kind,
                account_number: payload.account_number,
                balance_minor: payload.balance_minor,
            },
        )
        .await?;

    tracing::info!("account {} created for {}", account.id, principal.username);
    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<AccountListResponse>, ServerError> {
    let accounts = state
        .engine
        .list_accounts(&principal.key())
        .await?
        .into_iter()
        .map(map_account)
        .collect();
    Ok(Json(AccountListResponse { accounts }))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(account_id, &principal.key()).await?;
    Ok(Json(map_account(account)))
}

pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account(
            account_id,
            &principal.key(),
            engine::AccountPatch {
                account_number: payload.account_number,
                kind: payload.kind,
                balance_minor: payload.balance_minor,
            },
        )
        .await?;
    Ok(Json(map_account(account)))
}

pub async fn delete(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_account(account_id, &principal.key())
        .await?;
    tracing::info!("account {account_id} deleted by {}", principal.username);
    Ok(StatusCode::NO_CONTENT)
}
