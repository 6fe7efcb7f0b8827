//! Domain core of the banking backend.
//!
//! The [`Engine`] owns the database connection and exposes the user
//! directory, the account ledger and the transaction engine. Ownership
//! authorization routes through a single chokepoint in `ops::access`.

pub use accounts::Account;
pub use error::EngineError;
pub use ops::{AccountDraft, AccountPatch, Engine, EngineBuilder, UserDraft, UserPatch};
pub use transactions::{Transaction, TransactionKind};
pub use users::User;

pub mod accounts;
mod error;
mod ops;
mod password;
pub mod transactions;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
