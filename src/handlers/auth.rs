// src/handlers/auth.rs

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::{Config, DEFAULT_PROFILE_IMAGE},
    error::{AppError, is_unique_violation},
    models::user::{LoginForm, RegisterForm, User},
    utils::{
        flash::{Flash, redirect_with_flash, render_page},
        hash::{hash_password, verify_password},
        session::{clear_session_cookie, session_cookie, sign_session},
    },
};

const LOGIN_FAILED: &str = "Login unsuccessful. Please check email and password";

pub async fn register_page(headers: HeaderMap) -> Response {
    render_page(
        &headers,
        "Register",
        json!({
            "fields": ["username", "email", "password", "confirm_password", "role"],
            "roles": ["admin", "user"],
        }),
    )
}

/// Registers a new account.
///
/// Hashes the password using Argon2 before storing it, then sends the visitor
/// to the login page. A taken username or email is a 409.
pub async fn register(
    State(pool): State<SqlitePool>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let hashed_password = hash_password(&form.password)?;
    let role = form.role();

    sqlx::query(
        r#"
        INSERT INTO users (username, email, image, password, is_admin)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&form.username)
    .bind(&form.email)
    .bind(DEFAULT_PROFILE_IMAGE)
    .bind(&hashed_password)
    .bind(role.is_admin())
    .execute(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Username or email is already registered".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!(username = %form.username, %role, "account created");

    Ok(redirect_with_flash(
        "/login",
        Flash::success(format!("Account created for {}!", form.username)),
    ))
}

pub async fn login_page(headers: HeaderMap) -> Response {
    render_page(
        &headers,
        "Login",
        json!({
            "fields": ["email", "password", "role"],
            "roles": ["admin", "user"],
        }),
    )
}

/// Authenticates by email and password and establishes the session cookie.
///
/// The session role and the redirect target come from the stored account; the
/// role picked on the form is not consulted.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, image, password, is_admin, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&form.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    // Same message for an unknown email and a wrong password.
    let user = user.ok_or(AppError::AuthError(LOGIN_FAILED.to_string()))?;
    if !verify_password(&form.password, &user.password)? {
        return Err(AppError::AuthError(LOGIN_FAILED.to_string()));
    }

    let role = user.role();
    let token = sign_session(
        user.id,
        role,
        &config.session_secret,
        config.session_expiration,
    )?;

    tracing::info!(user_id = user.id, %role, "logged in");

    let flash = Flash::success("You have been logged in!");
    Ok((
        AppendHeaders([
            (SET_COOKIE, session_cookie(&token, &config)),
            (SET_COOKIE, flash.to_cookie()),
        ]),
        Redirect::to(&role.dashboard_path(user.id)),
    )
        .into_response())
}

/// Drops the session cookie.
pub async fn logout() -> Response {
    let flash = Flash::info("You have been logged out.");
    (
        AppendHeaders([
            (SET_COOKIE, clear_session_cookie()),
            (SET_COOKIE, flash.to_cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}
