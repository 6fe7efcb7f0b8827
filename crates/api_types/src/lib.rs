use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Registration payload. All three fields are required; they are
    /// optional here so the server can answer 400 instead of a
    /// deserialization rejection.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserCreate {
        pub username: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    /// Partial profile update; absent fields are no-ops.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub username: Option<String>,
        pub email: Option<String>,
    }

    /// A user as returned by the API. The credential hash never leaves the
    /// server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub email: String,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    /// Bearer credential for subsequent requests.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub token: String,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountCreate {
        /// Account type tag, e.g. "checking". Required.
        pub kind: Option<String>,
        /// Generated by the server when absent.
        pub account_number: Option<String>,
        /// Opening balance in minor units; defaults to 0.
        pub balance_minor: Option<i64>,
    }

    /// Partial account update; absent fields are no-ops.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub account_number: Option<String>,
        pub kind: Option<String>,
        pub balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub account_number: String,
        pub kind: String,
        pub balance_minor: i64,
        pub user_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountListResponse {
        pub accounts: Vec<AccountView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionCreate {
        /// Required; absent reads as "type required" (400).
        pub kind: Option<TransactionKind>,
        /// Must be > 0.
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        /// Server-assigned creation time (UTC).
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}
