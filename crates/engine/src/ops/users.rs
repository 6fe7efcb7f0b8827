//! User directory operations.

use sea_orm::{ActiveValue, Condition, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, password, users};

use super::{Engine, access::require_owner, normalize_optional, normalize_required, with_tx};

/// Fields required to register a user.
#[derive(Clone, Debug)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Engine {
    /// Registers a new user.
    ///
    /// The credential is argon2-hashed before it is persisted; username and
    /// email must be unique.
    pub async fn create_user(&self, draft: UserDraft) -> ResultEngine<User> {
        let username = normalize_required(&draft.username, "username")?;
        let email = normalize_required(&draft.email, "email")?;
        if draft.password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash = password::hash(&draft.password)?;

        with_tx!(self, |db| {
            self.require_identity_free(&db, &username, &email, None)
                .await?;

            let user = User::new(username, email, password_hash);
            users::ActiveModel::from(&user).insert(&db).await?;
            Ok(user)
        })
    }

    /// Returns a user record; callers may only read themselves.
    pub async fn user(&self, user_id: Uuid, caller_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db| {
            let model = self.require_user(&db, user_id).await?;
            require_owner(&model.id, caller_id, "user")?;
            User::try_from(model)
        })
    }

    /// Applies a partial profile update (username/email); absent fields are
    /// no-ops.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        caller_id: &str,
        patch: UserPatch,
    ) -> ResultEngine<User> {
        let username = normalize_optional(patch.username.as_deref());
        let email = normalize_optional(patch.email.as_deref());

        with_tx!(self, |db| {
            let model = self.require_user(&db, user_id).await?;
            require_owner(&model.id, caller_id, "user")?;

            self.require_identity_free(
                &db,
                username.as_deref().unwrap_or(""),
                email.as_deref().unwrap_or(""),
                Some(&model.id),
            )
            .await?;

            let mut active: users::ActiveModel = model.into();
            if let Some(username) = username {
                active.username = ActiveValue::Set(username);
            }
            if let Some(email) = email {
                active.email = ActiveValue::Set(email);
            }
            let updated = active.update(&db).await?;
            User::try_from(updated)
        })
    }

    /// Deletes a user; blocked while the user still owns bank accounts so no
    /// financial history is lost silently.
    pub async fn delete_user(&self, user_id: Uuid, caller_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db| {
            let model = self.require_user(&db, user_id).await?;
            require_owner(&model.id, caller_id, "user")?;

            if self.user_owns_accounts(&db, &model.id).await? {
                return Err(EngineError::Forbidden(
                    "cannot delete user with existing bank accounts".to_string(),
                ));
            }

            users::Entity::delete_by_id(model.id).exec(&db).await?;
            Ok(())
        })
    }

    /// Verifies a username/password pair, yielding the user on success.
    pub async fn verify_credentials(&self, username: &str, plaintext: &str) -> ResultEngine<User> {
        with_tx!(self, |db| {
            let Some(model) = self.find_user_by_username(&db, username).await? else {
                return Err(EngineError::BadCredentials(
                    "invalid credentials".to_string(),
                ));
            };
            password::verify(plaintext, &model.password_hash)?;
            User::try_from(model)
        })
    }

    /// Resolves an authenticated username into its durable user record.
    ///
    /// Called once per request by the HTTP auth layer; never cached.
    pub async fn principal(&self, username: &str) -> ResultEngine<User> {
        with_tx!(self, |db| {
            let model = self
                .find_user_by_username(&db, username)
                .await?
                .ok_or_else(|| EngineError::BadCredentials("unknown user".to_string()))?;
            User::try_from(model)
        })
    }

    /// Fails with `AlreadyExists` when another user already holds the given
    /// username or email. Empty strings are skipped; `exclude_id` exempts the
    /// user being updated.
    async fn require_identity_free(
        &self,
        db: &DatabaseTransaction,
        username: &str,
        email: &str,
        exclude_id: Option<&str>,
    ) -> ResultEngine<()> {
        let mut condition = Condition::any();
        if !username.is_empty() {
            condition = condition.add(users::Column::Username.eq(username.to_string()));
        }
        if !email.is_empty() {
            condition = condition.add(users::Column::Email.eq(email.to_string()));
        }
        if condition.is_empty() {
            return Ok(());
        }

        let mut query = users::Entity::find().filter(condition);
        if let Some(id) = exclude_id {
            query = query.filter(users::Column::Id.ne(id.to_string()));
        }

        if let Some(existing) = query.one(db).await? {
            let taken = if existing.username == username {
                existing.username
            } else {
                existing.email
            };
            return Err(EngineError::AlreadyExists(taken));
        }
        Ok(())
    }
}
