// src/handlers/quiz.rs

use axum::{
    Extension, Form,
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::dashboard::list_quizzes,
    models::{
        question::{ANSWER_LETTERS, CreateQuestionForm, PublicQuestion, Question},
        quiz::{AttemptQuizForm, AttemptQuizParams, CreateQuizForm, Quiz},
        subject::Subject,
    },
    utils::{
        flash::{Flash, redirect_with_flash, render_page},
        html::clean_html,
        session::Session,
    },
};

/// One entry of a submitted answer sheet: an option letter, or `None` when
/// the question was skipped.
pub type Answer = Option<char>;

/// Parses the free-form answers field into one entry per question.
///
/// Tokens are separated by commas and/or whitespace; a token may hold several
/// answers written back to back (`"acb"`). Letters are case-insensitive and
/// `-` skips a question.
pub fn parse_answers(raw: &str) -> Result<Vec<Answer>, String> {
    let mut answers = Vec::new();

    for token in raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        for c in token.chars() {
            let letter = c.to_ascii_lowercase();
            if letter == '-' {
                answers.push(None);
            } else if ANSWER_LETTERS.contains(&letter) {
                answers.push(Some(letter));
            } else {
                return Err(format!(
                    "Unrecognized answer '{}': use the letters a, b, c or d, or '-' to skip.",
                    c
                ));
            }
        }
    }

    Ok(answers)
}

/// Counts answers matching the key at the same position.
/// Skipped and missing answers score nothing.
pub fn calculate_score(answers: &[Answer], answer_key: &[String]) -> i64 {
    answers
        .iter()
        .zip(answer_key)
        .filter(|(answer, correct)| {
            answer.is_some_and(|letter| correct.chars().eq(std::iter::once(letter)))
        })
        .count() as i64
}

async fn fetch_quiz(pool: &SqlitePool, id: i64) -> Result<Option<Quiz>, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>("SELECT id, title, subject_id FROM quizzes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(quiz)
}

async fn fetch_questions(pool: &SqlitePool, quiz_id: i64) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, text, quiz_id, option_a, option_b, option_c, option_d, correct_answer
        FROM questions
        WHERE quiz_id = ?
        ORDER BY id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(questions)
}

/// Quiz form, with the subject choices loaded from the database.
pub async fn create_quiz_page(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, name, description FROM subjects ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    let choices: Vec<_> = subjects
        .into_iter()
        .map(|s| json!({ "value": s.id, "label": s.name }))
        .collect();

    Ok(render_page(
        &headers,
        "Create Quiz",
        json!({
            "fields": ["title", "subject_id"],
            "subject_choices": choices,
        }),
    ))
}

/// Creates a quiz under an existing subject.
/// Admin only.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<Session>,
    Form(form): Form<CreateQuizForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let subject_id = form.subject_id();
    let subject_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM subjects WHERE id = ?")
        .bind(subject_id)
        .fetch_optional(&pool)
        .await?
        .is_some();
    if !subject_exists {
        return Err(AppError::field(
            "subject_id",
            "unknown_subject",
            "Please choose an existing subject.".to_string(),
        ));
    }

    let id = sqlx::query("INSERT INTO quizzes (title, subject_id) VALUES (?, ?)")
        .bind(&form.title)
        .bind(subject_id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .last_insert_rowid();

    tracing::info!(quiz_id = id, subject_id, "quiz created");

    Ok(redirect_with_flash(
        &format!("/admin/{}", session.user_id),
        Flash::success("Quiz created successfully!"),
    ))
}

/// Question form, with the quiz choices loaded from the database.
pub async fn create_question_page(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let choices: Vec<_> = list_quizzes(&pool)
        .await?
        .into_iter()
        .map(|q| json!({ "value": q.id, "label": format!("{} ({})", q.title, q.subject_name) }))
        .collect();

    Ok(render_page(
        &headers,
        "Create Question",
        json!({
            "fields": ["quiz_id", "text", "option_a", "option_b", "option_c", "option_d", "correct_answer"],
            "quiz_choices": choices,
            "answer_choices": ANSWER_LETTERS,
        }),
    ))
}

/// Adds a multiple-choice question to an existing quiz.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<Session>,
    Form(form): Form<CreateQuestionForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let quiz_id = form.quiz_id();
    if fetch_quiz(&pool, quiz_id).await?.is_none() {
        return Err(AppError::field(
            "quiz_id",
            "unknown_quiz",
            "Please choose an existing quiz.".to_string(),
        ));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO questions
        (text, quiz_id, option_a, option_b, option_c, option_d, correct_answer)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(clean_html(&form.text))
    .bind(quiz_id)
    .bind(&form.option_a)
    .bind(&form.option_b)
    .bind(&form.option_c)
    .bind(&form.option_d)
    .bind(form.normalized_answer())
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .last_insert_rowid();

    tracing::info!(question_id = id, quiz_id, "question created");

    Ok(redirect_with_flash(
        &format!("/admin/{}", session.user_id),
        Flash::success("Question added successfully!"),
    ))
}

/// Without `quiz_id`: the list of quizzes. With it: the quiz and its questions,
/// answers hidden.
pub async fn attempt_quiz_page(
    State(pool): State<SqlitePool>,
    Query(params): Query<AttemptQuizParams>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(quiz_id) = params.quiz_id else {
        let quizzes = list_quizzes(&pool).await?;
        return Ok(render_page(
            &headers,
            "Attempt Quiz",
            json!({ "quizzes": quizzes }),
        ));
    };

    let quiz = fetch_quiz(&pool, quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let questions: Vec<PublicQuestion> = fetch_questions(&pool, quiz.id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(render_page(
        &headers,
        "Attempt Quiz",
        json!({
            "fields": ["quiz_id", "answers"],
            "quiz": quiz,
            "questions": questions,
        }),
    ))
}

/// Grades a submitted answer sheet and records the score.
///
/// * Answers are matched positionally against the quiz questions ordered by id.
/// * One point per correct answer; skipped or missing answers score nothing.
/// * Every attempt inserts a new row in `scores`.
pub async fn attempt_quiz(
    State(pool): State<SqlitePool>,
    Extension(session): Extension<Session>,
    Form(form): Form<AttemptQuizForm>,
) -> Result<Response, AppError> {
    form.validate()?;

    let quiz = fetch_quiz(&pool, form.quiz_id())
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    // A quiz without questions rejects every non-empty answer sheet below.
    let questions = fetch_questions(&pool, quiz.id).await?;

    let answers = parse_answers(&form.answers)
        .map_err(|msg| AppError::field("answers", "invalid_answer", msg))?;
    if answers.is_empty() {
        return Err(AppError::field(
            "answers",
            "required",
            "Answers are required.".to_string(),
        ));
    }
    if answers.len() > questions.len() {
        return Err(AppError::field(
            "answers",
            "too_many_answers",
            format!(
                "Got {} answers but the quiz has {} questions.",
                answers.len(),
                questions.len()
            ),
        ));
    }

    let answer_key: Vec<String> = questions.into_iter().map(|q| q.correct_answer).collect();
    let score = calculate_score(&answers, &answer_key);

    sqlx::query("INSERT INTO scores (user_id, quiz_id, score) VALUES (?, ?, ?)")
        .bind(session.user_id)
        .bind(quiz.id)
        .bind(score)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record score: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tracing::info!(
        user_id = session.user_id,
        quiz_id = quiz.id,
        score,
        total = answer_key.len(),
        "quiz graded"
    );

    Ok(redirect_with_flash(
        &format!("/user/{}", session.user_id),
        Flash::success(format!(
            "Quiz submitted successfully! You scored {}/{}.",
            score,
            answer_key.len()
        )),
    ))
}
