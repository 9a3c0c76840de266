// src/models/subject.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'subjects' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Form for creating a new subject.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectForm {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 50,
        message = "Subject name must be between 3 and 50 characters."
    ))]
    pub name: String,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Description is required and must be at most 200 characters."
    ))]
    pub description: String,
}
