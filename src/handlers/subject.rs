// src/handlers/subject.rs

use axum::{
    Extension, Form,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, is_unique_violation},
    models::subject::{CreateSubjectForm, Subject},
    utils::{
        flash::{Flash, redirect_with_flash, render_page},
        html::clean_html,
        session::Session,
    },
};

pub async fn create_subject_page(headers: HeaderMap) -> Response {
    render_page(
        &headers,
        "Create Subject",
        json!({ "fields": ["name", "description"] }),
    )
}

/// Creates a new subject.
/// Admin only. Subject names are unique; a duplicate is a 409.
pub async fn create_subject(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<Session>,
    Form(form): Form<CreateSubjectForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let name = form.name.as_str();
    let description = clean_html(&form.description);

    let id = sqlx::query("INSERT INTO subjects (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(&description)
        .execute(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Subject '{}' already exists", name))
            } else {
                tracing::error!("Failed to create subject: {:?}", e);
                AppError::from(e)
            }
        })?
        .last_insert_rowid();

    tracing::info!(subject_id = id, %name, "subject created");

    Ok(redirect_with_flash(
        &format!("/admin/{}", session.user_id),
        Flash::success(format!("Subject \"{}\" created successfully!", name)),
    ))
}

/// Lists every subject, ordered by name.
/// Admin only.
pub async fn manage_subjects(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, name, description FROM subjects ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list subjects: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(render_page(
        &headers,
        "Manage Subjects",
        json!({ "subjects": subjects }),
    ))
}
