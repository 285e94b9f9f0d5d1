mod common;

use serial_test::serial;
use sha2::{Digest, Sha256};

use social_api::db::Storage;
use social_api::error::AppError;
use social_api::models::{NewUser, RegisterUserPayload};

use common::*;

#[tokio::test]
#[serial]
async fn register_activate_login_lifecycle() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    let created = auth
        .register(RegisterUserPayload {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("register");

    assert!(!created.user.is_active);
    assert_eq!(created.token.len(), 64);

    // Inactive accounts are invisible to login.
    let err = auth
        .login("alice@example.com", TEST_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    auth.activate(&created.token).await.expect("activate");

    let user = storage
        .users
        .get_by_email("alice@example.com")
        .await
        .expect("activated user is visible");
    assert!(user.is_active);
    assert_eq!(user.role.name, "user");

    let token = auth
        .login("alice@example.com", TEST_PASSWORD)
        .await
        .expect("login after activation");
    assert!(!token.is_empty());
}

#[tokio::test]
#[serial]
async fn activation_token_is_single_use() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    let created = auth
        .register(RegisterUserPayload {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("register");

    auth.activate(&created.token).await.expect("first activation");

    let err = auth.activate(&created.token).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
#[serial]
async fn expired_invitation_reads_as_not_found() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    let token = "a".repeat(64);
    let token_hash = hex::encode(Sha256::digest(token.as_bytes()));

    storage
        .users
        .create_and_invite(
            NewUser {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                password_hash: "irrelevant".to_string(),
                role_name: "user".to_string(),
            },
            &token_hash,
            chrono::Duration::seconds(-60),
        )
        .await
        .expect("create invited user");

    let err = auth.activate(&token).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
#[serial]
async fn unknown_activation_token_is_not_found() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    let err = auth.activate("no-such-token").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
#[serial]
async fn duplicate_email_and_username_are_distinguished() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    auth.register(RegisterUserPayload {
        username: "dave".to_string(),
        email: "dave@example.com".to_string(),
        password: TEST_PASSWORD.to_string(),
    })
    .await
    .expect("first register");

    let err = auth
        .register(RegisterUserPayload {
            username: "dave2".to_string(),
            email: "dave@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail));

    let err = auth
        .register(RegisterUserPayload {
            username: "dave".to_string(),
            email: "dave2@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateUsername));
}

#[tokio::test]
#[serial]
async fn deleting_a_user_removes_pending_invitations() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);

    let created = auth
        .register(RegisterUserPayload {
            username: "erin".to_string(),
            email: "erin@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("register");

    storage
        .users
        .delete(created.user.id)
        .await
        .expect("delete user");

    let err = auth.activate(&created.token).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}
