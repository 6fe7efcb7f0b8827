//! Account ledger operations.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, EngineError, ResultEngine, accounts, accounts::generate_account_number, transactions,
};

use super::{Engine, normalize_optional, normalize_required, with_tx};

/// Fields for opening an account.
///
/// `account_number` is generated when absent; `balance_minor` defaults to 0.
#[derive(Clone, Debug)]
pub struct AccountDraft {
    pub kind: String,
    pub account_number: Option<String>,
    pub balance_minor: Option<i64>,
}

/// Partial account update; `None` fields are left untouched.
///
/// `balance_minor` here is the explicit administrative balance edit; regular
/// balance movement goes through `apply_transaction`.
#[derive(Clone, Debug, Default)]
pub struct AccountPatch {
    pub account_number: Option<String>,
    pub kind: Option<String>,
    pub balance_minor: Option<i64>,
}

impl Engine {
    /// Opens a new account owned by the caller.
    ///
    /// No ownership check: the creating user becomes the owner.
    pub async fn create_account(&self, user_id: Uuid, draft: AccountDraft) -> ResultEngine<Account> {
        let kind = normalize_required(&draft.kind, "account type")?;
        let account_number = match normalize_optional(draft.account_number.as_deref()) {
            Some(number) => number,
            None => generate_account_number(),
        };

        with_tx!(self, |db| {
            self.require_user(&db, user_id).await?;
            self.require_account_number_free(&db, &account_number, None)
                .await?;

            let account = Account::new(
                account_number,
                kind,
                draft.balance_minor.unwrap_or(0),
                user_id,
            );
            accounts::ActiveModel::from(&account).insert(&db).await?;
            Ok(account)
        })
    }

    /// Returns an account after the ownership check.
    pub async fn account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<Account> {
        with_tx!(self, |db| {
            let model = self.require_account(&db, account_id, user_id).await?;
            Account::try_from(model)
        })
    }

    /// Lists all accounts owned by the caller; order is not significant.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db| {
            let models = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .all(&db)
                .await?;
            models.into_iter().map(Account::try_from).collect()
        })
    }

    /// Applies a partial update to an owned account.
    pub async fn update_account(
        &self,
        account_id: Uuid,
        user_id: &str,
        patch: AccountPatch,
    ) -> ResultEngine<Account> {
        let account_number = normalize_optional(patch.account_number.as_deref());
        let kind = normalize_optional(patch.kind.as_deref());

        with_tx!(self, |db| {
            let model = self.require_account(&db, account_id, user_id).await?;

            if let Some(number) = &account_number {
                self.require_account_number_free(&db, number, Some(&model.id))
                    .await?;
            }

            let mut active: accounts::ActiveModel = model.into();
            if let Some(number) = account_number {
                active.account_number = ActiveValue::Set(number);
            }
            if let Some(kind) = kind {
                active.kind = ActiveValue::Set(kind);
            }
            if let Some(balance_minor) = patch.balance_minor {
                active.balance_minor = ActiveValue::Set(balance_minor);
            }
            let updated = active.update(&db).await?;
            Account::try_from(updated)
        })
    }

    /// Deletes an owned account and all of its transactions atomically.
    pub async fn delete_account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db| {
            let model = self.require_account(&db, account_id, user_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::AccountId.eq(model.id.clone()))
                .exec(&db)
                .await?;
            accounts::Entity::delete_by_id(model.id).exec(&db).await?;
            Ok(())
        })
    }

    async fn require_account_number_free(
        &self,
        db: &sea_orm::DatabaseTransaction,
        account_number: &str,
        exclude_id: Option<&str>,
    ) -> ResultEngine<()> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(account_number.to_string()));
        if let Some(id) = exclude_id {
            query = query.filter(accounts::Column::Id.ne(id.to_string()));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::AlreadyExists(account_number.to_string()));
        }
        Ok(())
    }
}
