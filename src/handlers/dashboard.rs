// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        quiz::QuizListing,
        score::ScoreEntry,
        subject::Subject,
        user::{Role, User},
    },
    utils::flash::{Flash, redirect_with_flash, render_page},
};

pub(crate) async fn fetch_user(pool: &SqlitePool, id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, image, password, is_admin, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))
}

pub(crate) async fn list_quizzes(pool: &SqlitePool) -> Result<Vec<QuizListing>, AppError> {
    let quizzes = sqlx::query_as::<_, QuizListing>(
        r#"
        SELECT q.id, q.title, q.subject_id, s.name AS subject_name
        FROM quizzes q
        JOIN subjects s ON q.subject_id = s.id
        ORDER BY s.name, q.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}

/// Admin dashboard.
///
/// The account is looked up by path id and must be an admin; anyone else is
/// redirected home with an access-denied message.
pub async fn admin_dashboard(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = fetch_user(&pool, id).await?;

    if user.role() != Role::Admin {
        tracing::warn!(user_id = user.id, "admin dashboard denied");
        return Ok(redirect_with_flash("/", Flash::danger("Access Denied!")));
    }

    let subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, name, description FROM subjects ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;
    let quizzes = list_quizzes(&pool).await?;

    Ok(render_page(
        &headers,
        "Admin Dashboard",
        json!({
            "user": user,
            "subjects": subjects,
            "quizzes": quizzes,
        }),
    ))
}

/// User dashboard: the account, its recorded scores and the quizzes on offer.
///
/// Any visitor may view any existing account's dashboard.
pub async fn user_dashboard(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = fetch_user(&pool, id).await?;

    let scores = sqlx::query_as::<_, ScoreEntry>(
        r#"
        SELECT s.quiz_id, q.title AS quiz_title, s.score, s.created_at
        FROM scores s
        JOIN quizzes q ON s.quiz_id = q.id
        WHERE s.user_id = ?
        ORDER BY s.created_at DESC, s.id DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;
    let quizzes = list_quizzes(&pool).await?;

    Ok(render_page(
        &headers,
        "User Dashboard",
        json!({
            "user": user,
            "scores": scores,
            "quizzes": quizzes,
        }),
    ))
}
