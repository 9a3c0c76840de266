// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
}

/// A quiz joined with the name of its subject, for listings.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizListing {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
    pub subject_name: String,
}

/// Form for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizForm {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 150,
        message = "Title is required and must be at most 150 characters."
    ))]
    pub title: String,

    /// Chosen from the subject select list.
    #[serde(default, deserialize_with = "super::form_id")]
    #[validate(
        required(message = "Please choose a subject."),
        range(min = 1, message = "Please choose a subject.")
    )]
    pub subject_id: Option<i64>,
}

impl CreateQuizForm {
    /// The chosen subject; only meaningful after `validate()` succeeded.
    pub fn subject_id(&self) -> i64 {
        self.subject_id.unwrap_or_default()
    }
}

/// Query string of `GET /attempt_quiz`.
#[derive(Debug, Deserialize)]
pub struct AttemptQuizParams {
    #[serde(default, deserialize_with = "super::form_id")]
    pub quiz_id: Option<i64>,
}

/// Quiz attempt form.
///
/// `answers` lists one option letter per question, in question order, for
/// example `"a,c,b,d"`, `"a c b d"` or `"acbd"`. A `-` skips a question.
#[derive(Debug, Deserialize, Validate)]
pub struct AttemptQuizForm {
    #[serde(default, deserialize_with = "super::form_id")]
    #[validate(
        required(message = "Quiz ID is required."),
        range(min = 1, message = "Quiz ID is required.")
    )]
    pub quiz_id: Option<i64>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Answers are required."))]
    pub answers: String,
}

impl AttemptQuizForm {
    /// The attempted quiz; only meaningful after `validate()` succeeded.
    pub fn quiz_id(&self) -> i64 {
        self.quiz_id.unwrap_or_default()
    }
}
