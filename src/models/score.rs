// src/models/score.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'scores' table in the database.
/// One row per graded quiz attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    /// Number of correctly answered questions.
    pub score: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// A score joined with its quiz title, shown on the user dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct ScoreEntry {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}
