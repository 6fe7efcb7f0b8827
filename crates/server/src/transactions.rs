//! Transaction API endpoints.

use api_types::transaction::{
    TransactionCreate, TransactionKind as ApiKind, TransactionListResponse, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, auth::Principal, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Withdrawal => ApiKind::Withdrawal,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        kind: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        created_at: tx.created_at,
    }
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<TransactionCreate>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Some(kind) = payload.kind else {
        return Err(ServerError::Generic("transaction type required".to_string()));
    };
    let Some(amount_minor) = payload.amount_minor else {
        return Err(ServerError::Generic("amount_minor required".to_string()));
    };

    let kind = match kind {
        ApiKind::Deposit => engine::TransactionKind::Deposit,
        ApiKind::Withdrawal => engine::TransactionKind::Withdrawal,
    };

    let tx = state
        .engine
        .apply_transaction(account_id, &principal.key(), kind, amount_minor)
        .await?;

    tracing::info!("transaction {} created on account {account_id}", tx.id);
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(account_id, &principal.key())
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .transaction(account_id, transaction_id, &principal.key())
        .await?;
    Ok(Json(map_transaction(tx)))
}
