//! Bank account primitives.
//!
//! An `Account` belongs to exactly one user and holds a balance in integer
//! minor units. The balance moves only through the transaction engine or an
//! explicit owner-initiated update.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Unique human-facing account number.
    pub account_number: String,
    /// Free-form type tag ("checking", "savings", ...).
    pub kind: String,
    pub balance_minor: i64,
    pub user_id: Uuid,
}

impl Account {
    pub fn new(account_number: String, kind: String, balance_minor: i64, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number,
            kind,
            balance_minor,
            user_id,
        }
    }
}

/// Derives a 16-digit account number from a fresh UUID.
pub(crate) fn generate_account_number() -> String {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(16)
        .collect();
    format!("GRZ{digits}")
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_number: String,
    pub kind: String,
    pub balance_minor: i64,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            account_number: ActiveValue::Set(account.account_number.clone()),
            kind: ActiveValue::Set(account.kind.clone()),
            balance_minor: ActiveValue::Set(account.balance_minor),
            user_id: ActiveValue::Set(account.user_id.to_string()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("account not exists".to_string()))?,
            account_number: model.account_number,
            kind: model.kind,
            balance_minor: model.balance_minor,
            user_id: Uuid::parse_str(&model.user_id)
                .map_err(|_| EngineError::KeyNotFound("user not exists".to_string()))?,
        })
    }
}
