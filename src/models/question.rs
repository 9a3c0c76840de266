// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Option letters a question can be answered with.
pub const ANSWER_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    pub text: String,

    pub quiz_id: i64,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// Letter of the correct option, always lowercase.
    pub correct_answer: String,
}

/// DTO for sending a question to the quiz taker (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub options: [String; 4],
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            id: q.id,
            text: q.text,
            options: [q.option_a, q.option_b, q.option_c, q.option_d],
        }
    }
}

/// Form for adding a question to a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionForm {
    #[serde(default, deserialize_with = "super::form_id")]
    #[validate(
        required(message = "Please choose a quiz."),
        range(min = 1, message = "Please choose a quiz.")
    )]
    pub quiz_id: Option<i64>,

    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 500,
        message = "Question is required and must be at most 500 characters."
    ))]
    pub text: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Option A is required (max 200 characters)."))]
    pub option_a: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Option B is required (max 200 characters)."))]
    pub option_b: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Option C is required (max 200 characters)."))]
    pub option_c: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Option D is required (max 200 characters)."))]
    pub option_d: String,

    #[serde(default)]
    #[validate(custom(function = validate_answer_letter))]
    pub correct_answer: String,
}

impl CreateQuestionForm {
    /// The target quiz; only meaningful after `validate()` succeeded.
    pub fn quiz_id(&self) -> i64 {
        self.quiz_id.unwrap_or_default()
    }

    /// The correct answer as stored: a single lowercase letter.
    pub fn normalized_answer(&self) -> String {
        self.correct_answer.trim().to_ascii_lowercase()
    }
}

/// Accepts exactly one of a, b, c, d (either case).
fn validate_answer_letter(answer: &str) -> Result<(), validator::ValidationError> {
    let mut chars = answer.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if ANSWER_LETTERS.contains(&c.to_ascii_lowercase()) => Ok(()),
        _ => {
            let mut err = validator::ValidationError::new("invalid_answer");
            err.message = Some("Correct answer must be one of a, b, c or d.".into());
            Err(err)
        }
    }
}
