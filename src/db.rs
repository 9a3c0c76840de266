// src/db.rs

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use validator::Validate;

use crate::{
    config::{Config, DEFAULT_PROFILE_IMAGE},
    error::AppError,
    models::user::RegisterForm,
    utils::hash::hash_password,
};

/// Schema migrations, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const CONNECT_ATTEMPTS: u32 = 5;

/// Opens the connection pool, retrying while the database is unavailable.
pub async fn connect_with_retry(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut retry_count = 0;
    loop {
        match pool_options(config)
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_ATTEMPTS {
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

fn pool_options(config: &Config) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3));

    // An in-memory database lives only as long as one of its connections.
    if config.database_url.contains(":memory:") {
        options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options
    }
}

/// Creates the configured admin account unless the username or email is taken.
///
/// Does nothing unless username, email and password are all configured. The
/// credentials go through the same rules as a registration.
pub async fn seed_admin_user(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(username), Some(email), Some(password)) = (
        &config.admin_username,
        &config.admin_email,
        &config.admin_password,
    ) else {
        return Ok(());
    };

    RegisterForm {
        username: username.clone(),
        email: email.clone(),
        password: password.clone(),
        confirm_password: password.clone(),
        role: "admin".to_string(),
    }
    .validate()?;

    let existing = sqlx::query_scalar::<_, bool>(
        "SELECT is_admin FROM users WHERE email = ? OR username = ?",
    )
    .bind(email)
    .bind(username)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(true) => {}
        Some(false) => {
            tracing::warn!(
                "Configured admin {} <{}> matches an existing non-admin account; not promoting it.",
                username,
                email
            );
        }
        None => {
            tracing::info!("Seeding admin user: {}", username);
            let hashed_password = hash_password(password)?;

            sqlx::query(
                "INSERT INTO users (username, email, image, password, is_admin) VALUES (?, ?, ?, ?, TRUE)",
            )
            .bind(username)
            .bind(email)
            .bind(DEFAULT_PROFILE_IMAGE)
            .bind(hashed_password)
            .execute(pool)
            .await?;
            tracing::info!("Admin user created successfully.");
        }
    }

    Ok(())
}
