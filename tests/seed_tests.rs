// tests/seed_tests.rs

mod common;

use common::{spawn_app, test_config};
use quizhub::{
    db::seed_admin_user,
    error::{AppError, field_messages},
};

#[tokio::test]
async fn configured_admin_is_seeded_once() {
    let app = spawn_app().await;
    let mut config = test_config();
    config.admin_username = Some("root".to_string());
    config.admin_email = Some("root@x.com".to_string());
    config.admin_password = Some("secret1".to_string());

    seed_admin_user(&app.pool, &config).await.unwrap();
    seed_admin_user(&app.pool, &config).await.unwrap();

    assert_eq!(app.count("users").await, 1);
    let login = app.login("root@x.com", "secret1", "user").await;
    let root_id = app.user_id("root").await;
    assert_eq!(common::location(&login), format!("/admin/{}", root_id));
}

#[tokio::test]
async fn partial_admin_config_seeds_nothing() {
    let app = spawn_app().await;
    let mut config = test_config();
    config.admin_username = Some("root".to_string());

    seed_admin_user(&app.pool, &config).await.unwrap();

    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn invalid_admin_credentials_are_rejected() {
    let app = spawn_app().await;
    let mut config = test_config();
    config.admin_username = Some("root".to_string());
    config.admin_email = Some("not-an-email".to_string());
    config.admin_password = Some("abc".to_string());

    let err = seed_admin_user(&app.pool, &config).await.unwrap_err();

    let AppError::Validation(errors) = err else {
        panic!("expected a validation error, got {:?}", err);
    };
    let fields = field_messages(&errors);
    assert!(fields.contains_key("email"));
    assert!(fields.contains_key("password"));
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn existing_regular_account_is_not_promoted() {
    let app = spawn_app().await;
    let registered = app.register("root", "root@x.com", "secret1", "user").await;
    assert_eq!(registered.status().as_u16(), 303);

    let mut config = test_config();
    config.admin_username = Some("superuser".to_string());
    config.admin_email = Some("root@x.com".to_string());
    config.admin_password = Some("secret2".to_string());

    seed_admin_user(&app.pool, &config).await.unwrap();

    assert_eq!(app.count("users").await, 1);
    let is_admin: bool = sqlx::query_scalar("SELECT is_admin FROM users WHERE email = 'root@x.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(!is_admin);
}

#[tokio::test]
async fn username_clash_is_not_reseeded() {
    let app = spawn_app().await;
    app.register("root", "someone@x.com", "secret1", "user").await;

    let mut config = test_config();
    config.admin_username = Some("root".to_string());
    config.admin_email = Some("root@x.com".to_string());
    config.admin_password = Some("secret1".to_string());

    seed_admin_user(&app.pool, &config).await.unwrap();

    assert_eq!(app.count("users").await, 1);
}
