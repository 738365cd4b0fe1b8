//! Account store and service behaviour against an in-memory database.

use std::sync::Arc;
use tessera::config::{Config, SecurityConfig};
use tessera::db::{CreateUserError, Store};
use tessera::db::repositories::user::{UNUSABLE_PASSWORD_PREFIX, verify_password};
use tessera::domain::NewAccount;
use tessera::services::AccountError;
use tessera::state::SharedState;

fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    }
}

async fn memory_store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open in-memory store")
}

async fn shared_state() -> Arc<SharedState> {
    let mut config = Config::default();
    config.security = fast_security();
    Arc::new(SharedState::with_store(config, memory_store().await))
}

#[tokio::test]
async fn test_create_user_normalizes_email_and_sets_regular_flags() {
    let store = memory_store().await;

    let account = store
        .create_user(
            "Test@EXAMPLE.COM",
            Some("pass123"),
            &NewAccount::named("Ameer Hamza"),
            &fast_security(),
        )
        .await
        .unwrap();

    assert_eq!(account.email, "Test@example.com");
    assert_eq!(account.name, "Ameer Hamza");
    assert!(account.is_active);
    assert!(!account.is_staff);
    assert!(!account.is_superuser);
    assert!(account.last_login.is_none());

    // Lookups normalize too, the local part stays case-sensitive
    assert!(store.get_user_by_email("Test@Example.com").await.unwrap().is_some());
    assert!(store.get_user_by_email("test@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_superuser_sets_all_flags() {
    let store = memory_store().await;

    let account = store
        .create_superuser(
            "admin@example.com",
            Some("admin-pass"),
            &NewAccount::default(),
            &fast_security(),
        )
        .await
        .unwrap();

    assert!(account.is_active);
    assert!(account.is_staff);
    assert!(account.is_superuser);
    assert_eq!(account.name, "");
}

#[tokio::test]
async fn test_duplicate_email_leaves_existing_account_untouched() {
    let store = memory_store().await;
    let security = fast_security();

    let original = store
        .create_user("dup@example.com", Some("first-pass"), &NewAccount::named("First"), &security)
        .await
        .unwrap();

    let err = store
        .create_superuser("dup@example.com", Some("second-pass"), &NewAccount::named("Second"), &security)
        .await
        .unwrap_err();
    assert!(matches!(err, CreateUserError::DuplicateEmail(ref email) if email == "dup@example.com"));

    let (stored, hash) = store
        .get_user_by_email_with_password("dup@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, original);
    assert!(!stored.is_superuser);
    assert!(verify_password("first-pass", &hash));
    assert!(!verify_password("second-pass", &hash));
}

#[tokio::test]
async fn test_missing_password_is_unusable() {
    let store = memory_store().await;
    let security = fast_security();

    store
        .create_user("nopass@example.com", None, &NewAccount::default(), &security)
        .await
        .unwrap();

    let (_, hash) = store
        .get_user_by_email_with_password("nopass@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(hash.starts_with(UNUSABLE_PASSWORD_PREFIX));

    let verified = store
        .verify_user_credentials("nopass@example.com", "", &security)
        .await
        .unwrap();
    assert!(verified.is_none());
}

#[tokio::test]
async fn test_verify_credentials() {
    let store = memory_store().await;
    let security = fast_security();

    store
        .create_user("login@example.com", Some("right-pass"), &NewAccount::default(), &security)
        .await
        .unwrap();

    assert!(
        store
            .verify_user_credentials("login@EXAMPLE.com", "right-pass", &security)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        store
            .verify_user_credentials("login@example.com", "wrong-pass", &security)
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_user_credentials("ghost@example.com", "right-pass", &security)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_token_lifecycle() {
    let state = shared_state().await;
    let service = &state.account_service;

    let account = service
        .create_user("tok@example.com", Some("test-pass-123"), NewAccount::default())
        .await
        .unwrap();
    assert!(state.store.get_user_token(account.id).await.unwrap().is_none());

    let issued = service
        .issue_token("tok@example.com", "test-pass-123")
        .await
        .unwrap();
    assert_eq!(
        state.store.get_user_token(account.id).await.unwrap(),
        Some(issued.token.clone())
    );

    let again = service
        .issue_token("tok@example.com", "test-pass-123")
        .await
        .unwrap();
    assert_eq!(issued.token, again.token);

    let resolved = service.authenticate_token(&issued.token).await.unwrap();
    assert_eq!(resolved.id, account.id);
    assert!(resolved.last_login.is_some());

    assert!(matches!(
        service.authenticate_token("0000").await,
        Err(AccountError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_issue_token_failures_are_indistinguishable() {
    let state = shared_state().await;
    let service = &state.account_service;

    service
        .create_user("real@example.com", Some("good-pass"), NewAccount::default())
        .await
        .unwrap();

    let wrong = service.issue_token("real@example.com", "bad-pass").await;
    let unknown = service.issue_token("fake@example.com", "good-pass").await;

    assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));
    assert!(matches!(unknown, Err(AccountError::InvalidCredentials)));
}

#[tokio::test]
async fn test_concurrent_creation_has_single_winner() {
    let state = shared_state().await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let service = state.account_service.clone();
        handles.push(tokio::spawn(async move {
            let password = format!("pass-{i}");
            service
                .create_user("race@example.com", Some(password.as_str()), NewAccount::default())
                .await
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AccountError::DuplicateEmail) => duplicates += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 3);
}
