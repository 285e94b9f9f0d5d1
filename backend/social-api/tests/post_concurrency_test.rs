mod common;

use serial_test::serial;

use social_api::db::Storage;
use social_api::error::AppError;
use social_api::models::NewPost;

use common::*;

#[tokio::test]
#[serial]
async fn update_advances_version_by_exactly_one() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);
    let author = register_active_user(&auth, &storage, "author1").await;

    let post = storage
        .posts
        .create(NewPost {
            user_id: author.id,
            title: "first draft".to_string(),
            content: "hello".to_string(),
            tags: vec!["intro".to_string()],
        })
        .await
        .expect("create post");
    assert_eq!(post.version, 1);

    let mut edited = post.clone();
    edited.title = "second draft".to_string();
    let updated = storage.posts.update(&edited).await.expect("first update");
    assert_eq!(updated.version, 2);
    assert_eq!(updated.title, "second draft");
}

#[tokio::test]
#[serial]
async fn stale_version_update_is_not_found() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);
    let author = register_active_user(&auth, &storage, "author2").await;

    let post = storage
        .posts
        .create(NewPost {
            user_id: author.id,
            title: "contended".to_string(),
            content: "v1".to_string(),
            tags: Vec::new(),
        })
        .await
        .expect("create post");

    // Two writers both read the post at version 1.
    let mut first = post.clone();
    first.content = "writer one".to_string();
    let mut second = post.clone();
    second.content = "writer two".to_string();

    storage.posts.update(&first).await.expect("first writer wins");

    let err = storage.posts.update(&second).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let current = storage
        .posts
        .get_by_id(post.id)
        .await
        .expect("post still readable");
    assert_eq!(current.content, "writer one");
    assert_eq!(current.version, 2);
}

#[tokio::test]
#[serial]
async fn concurrent_updates_admit_exactly_one_winner() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);
    let author = register_active_user(&auth, &storage, "author3").await;

    let post = storage
        .posts
        .create(NewPost {
            user_id: author.id,
            title: "race".to_string(),
            content: "v1".to_string(),
            tags: Vec::new(),
        })
        .await
        .expect("create post");

    let mut a = post.clone();
    a.content = "a".to_string();
    let mut b = post.clone();
    b.content = "b".to_string();

    let (res_a, res_b) = tokio::join!(storage.posts.update(&a), storage.posts.update(&b));

    let wins = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);

    let loser = if res_a.is_err() { res_a } else { res_b };
    assert!(matches!(loser.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
#[serial]
async fn deleted_post_is_gone_for_every_operation() {
    let pool = setup_pool().await;
    let storage = Storage::new(pool);
    let auth = auth_service(&storage);
    let author = register_active_user(&auth, &storage, "author4").await;

    let post = storage
        .posts
        .create(NewPost {
            user_id: author.id,
            title: "ephemeral".to_string(),
            content: "soon gone".to_string(),
            tags: Vec::new(),
        })
        .await
        .expect("create post");

    storage.posts.delete(post.id).await.expect("delete");

    assert!(matches!(
        storage.posts.get_by_id(post.id).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        storage.posts.delete(post.id).await.unwrap_err(),
        AppError::NotFound
    ));
    assert!(matches!(
        storage.posts.update(&post).await.unwrap_err(),
        AppError::NotFound
    ));
}
