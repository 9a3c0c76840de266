// src/handlers/pages.rs

use axum::{http::HeaderMap, response::Response};
use serde_json::json;

use crate::utils::flash::render_page;

/// Landing page, served for both `/` and `/home`.
pub async fn home(headers: HeaderMap) -> Response {
    render_page(
        &headers,
        "Home",
        json!({
            "links": {
                "register": "/register",
                "login": "/login",
                "quizzes": "/attempt_quiz",
            }
        }),
    )
}

pub async fn about(headers: HeaderMap) -> Response {
    render_page(
        &headers,
        "About",
        json!({
            "description": "Administrators create subjects, quizzes and questions; \
                            users register, attempt quizzes and get their scores recorded."
        }),
    )
}
