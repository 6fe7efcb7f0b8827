//! Ownership checks.
//!
//! Every operation that touches an account or its transactions authorizes
//! through [`require_account`], which in turn routes through
//! [`require_owner`]. No other owner comparison exists in the engine.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, users};

use super::Engine;

/// The authorization gate: caller identity must equal the resource owner
/// identity, anything else is `Forbidden`.
pub(super) fn require_owner(owner_id: &str, user_id: &str, what: &str) -> ResultEngine<()> {
    if owner_id != user_id {
        return Err(EngineError::Forbidden(format!(
            "you are not authorized to access this {what}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Resolves an account and authorizes the caller as its owner.
    ///
    /// This is the single chokepoint reused by every account and transaction
    /// operation: `KeyNotFound` when the id does not resolve, `Forbidden`
    /// when the resolved owner differs from the caller.
    pub(super) async fn require_account(
        &self,
        db: &DatabaseTransaction,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<accounts::Model> {
        let model = accounts::Entity::find_by_id(account_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))?;
        require_owner(&model.user_id, user_id, "account")?;
        Ok(model)
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn find_user_by_username(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn user_owns_accounts(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<bool> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map(|model| model.is_some())
            .map_err(Into::into)
    }
}
