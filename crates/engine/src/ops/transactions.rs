//! Transaction engine operations.
//!
//! `apply_transaction` is the only writer of account balances: the balance
//! update and the ledger row are persisted in one DB transaction, so they
//! either both land or neither does.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, accounts, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Applies a deposit or withdrawal to an owned account.
    ///
    /// The account is re-read inside the DB transaction, so two concurrent
    /// applications on the same account serialize instead of losing an
    /// update. Withdrawals require a sufficient balance.
    pub async fn apply_transaction(
        &self,
        account_id: Uuid,
        user_id: &str,
        kind: TransactionKind,
        amount_minor: i64,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db| {
            let account = self.require_account(&db, account_id, user_id).await?;

            let tx = Transaction::new(account_id, kind, amount_minor, Utc::now())?;

            let new_balance = match kind {
                TransactionKind::Deposit => account.balance_minor + tx.amount_minor,
                TransactionKind::Withdrawal => {
                    if account.balance_minor < tx.amount_minor {
                        return Err(EngineError::InsufficientFunds(format!(
                            "balance is {}, requested {}",
                            account.balance_minor, tx.amount_minor
                        )));
                    }
                    account.balance_minor - tx.amount_minor
                }
            };

            let account_update = accounts::ActiveModel {
                id: ActiveValue::Set(account.id),
                balance_minor: ActiveValue::Set(new_balance),
                ..Default::default()
            };
            account_update.update(&db).await?;
            transactions::ActiveModel::from(&tx).insert(&db).await?;

            Ok(tx)
        })
    }

    /// Lists the ledger of an owned account, newest first.
    pub async fn list_transactions(
        &self,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db| {
            self.require_account(&db, account_id, user_id).await?;

            let models = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account_id.to_string()))
                .order_by_desc(transactions::Column::CreatedAt)
                .all(&db)
                .await?;
            models.into_iter().map(Transaction::try_from).collect()
        })
    }

    /// Fetches one ledger row of an owned account.
    ///
    /// The lookup is filtered by the account id, so a transaction reached
    /// through a foreign account path reads as not-found rather than leaking.
    pub async fn transaction(
        &self,
        account_id: Uuid,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db| {
            self.require_account(&db, account_id, user_id).await?;

            let model = transactions::Entity::find_by_id(transaction_id.to_string())
                .filter(transactions::Column::AccountId.eq(account_id.to_string()))
                .one(&db)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("transaction not exists for this account".to_string())
                })?;
            Transaction::try_from(model)
        })
    }
}
