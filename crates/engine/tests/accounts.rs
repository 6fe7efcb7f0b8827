use sea_orm::Database;

use engine::{AccountDraft, AccountPatch, Engine, EngineError, User, UserDraft, UserPatch};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn register(engine: &Engine, username: &str) -> User {
    engine
        .create_user(UserDraft {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn create_user_rejects_taken_username_and_email() {
    let engine = engine_with_db().await;
    register(&engine, "alice").await;

    let err = engine
        .create_user(UserDraft {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AlreadyExists("alice".to_string()));

    let err = engine
        .create_user(UserDraft {
            username: "alice2".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AlreadyExists("alice@example.com".to_string())
    );
}

#[tokio::test]
async fn verify_credentials_accepts_good_and_rejects_bad() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let verified = engine.verify_credentials("alice", "hunter2").await.unwrap();
    assert_eq!(verified.id, alice.id);

    let err = engine
        .verify_credentials("alice", "wrong")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BadCredentials("invalid credentials".to_string())
    );

    let err = engine
        .verify_credentials("nobody", "hunter2")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::BadCredentials("invalid credentials".to_string())
    );
}

#[tokio::test]
async fn user_can_only_read_and_update_themselves() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    let fetched = engine.user(alice.id, &alice.id.to_string()).await.unwrap();
    assert_eq!(fetched.username, "alice");

    let err = engine
        .user(alice.id, &bob.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("you are not authorized to access this user".to_string())
    );

    let err = engine
        .update_user(
            alice.id,
            &bob.id.to_string(),
            UserPatch {
                username: Some("mallory".to_string()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .delete_user(alice.id, &bob.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn update_user_applies_partial_patch() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let updated = engine
        .update_user(
            alice.id,
            &alice.id.to_string(),
            UserPatch {
                username: None,
                email: Some("new@example.com".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "alice");
    assert_eq!(updated.email, "new@example.com");

    // Re-submitting the current username is not a conflict with oneself.
    let updated = engine
        .update_user(
            alice.id,
            &alice.id.to_string(),
            UserPatch {
                username: Some("alice".to_string()),
                email: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "alice");
}

#[tokio::test]
async fn update_user_rejects_identity_taken_by_another() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    register(&engine, "bob").await;

    let err = engine
        .update_user(
            alice.id,
            &alice.id.to_string(),
            UserPatch {
                username: Some("bob".to_string()),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::AlreadyExists("bob".to_string()));
}

#[tokio::test]
async fn delete_user_blocked_while_accounts_exist() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let account = engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: None,
                balance_minor: None,
            },
        )
        .await
        .unwrap();

    let err = engine
        .delete_user(alice.id, &alice.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Forbidden("cannot delete user with existing bank accounts".to_string())
    );

    engine
        .delete_account(account.id, &alice.id.to_string())
        .await
        .unwrap();
    engine
        .delete_user(alice.id, &alice.id.to_string())
        .await
        .unwrap();

    let err = engine
        .user(alice.id, &alice.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
}

#[tokio::test]
async fn create_account_generates_number_and_defaults_balance() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let account = engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: None,
                balance_minor: None,
            },
        )
        .await
        .unwrap();

    assert!(account.account_number.starts_with("GRZ"));
    assert_eq!(account.balance_minor, 0);
    assert_eq!(account.user_id, alice.id);

    let fetched = engine
        .account(account.id, &alice.id.to_string())
        .await
        .unwrap();
    assert_eq!(fetched, account);
}

#[tokio::test]
async fn create_account_rejects_taken_account_number() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: Some("GRZ0000000000000001".to_string()),
                balance_minor: None,
            },
        )
        .await
        .unwrap();

    let err = engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "savings".to_string(),
                account_number: Some("GRZ0000000000000001".to_string()),
                balance_minor: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AlreadyExists("GRZ0000000000000001".to_string())
    );
}

#[tokio::test]
async fn list_accounts_sees_only_own_accounts() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    for kind in ["personal", "savings"] {
        engine
            .create_account(
                alice.id,
                AccountDraft {
                    kind: kind.to_string(),
                    account_number: None,
                    balance_minor: None,
                },
            )
            .await
            .unwrap();
    }
    engine
        .create_account(
            bob.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: None,
                balance_minor: None,
            },
        )
        .await
        .unwrap();

    let accounts = engine.list_accounts(&alice.id.to_string()).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts.iter().all(|a| a.user_id == alice.id));
}

#[tokio::test]
async fn account_access_is_owner_only() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    let account = engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: None,
                balance_minor: None,
            },
        )
        .await
        .unwrap();

    let forbidden = EngineError::Forbidden(
        "you are not authorized to access this account".to_string(),
    );

    let err = engine
        .account(account.id, &bob.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err, forbidden);

    let err = engine
        .update_account(account.id, &bob.id.to_string(), AccountPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, forbidden);

    let err = engine
        .delete_account(account.id, &bob.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(err, forbidden);

    let err = engine
        .account(Uuid::new_v4(), &alice.id.to_string())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("account not exists".to_string())
    );
}

#[tokio::test]
async fn update_account_applies_partial_patch() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let account = engine
        .create_account(
            alice.id,
            AccountDraft {
                kind: "personal".to_string(),
                account_number: None,
                balance_minor: Some(10_00),
            },
        )
        .await
        .unwrap();

    let updated = engine
        .update_account(
            account.id,
            &alice.id.to_string(),
            AccountPatch {
                account_number: None,
                kind: Some("savings".to_string()),
                balance_minor: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.kind, "savings");
    assert_eq!(updated.account_number, account.account_number);
    assert_eq!(updated.balance_minor, 10_00);

    // An all-None patch is a no-op.
    let unchanged = engine
        .update_account(account.id, &alice.id.to_string(), AccountPatch::default())
        .await
        .unwrap();
    assert_eq!(unchanged, updated);
}
