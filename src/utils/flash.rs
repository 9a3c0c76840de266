// src/utils/flash.rs

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::{
    config::FLASH_COOKIE,
    utils::cookie::{build_cookie, expired_cookie, read_cookie},
};

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    /// 'success', 'info' or 'danger'.
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn new(category: &str, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("success", message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new("info", message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new("danger", message)
    }

    /// Cookie-safe encoding: `category=...&message=...`, form-urlencoded.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("category", &self.category)
            .append_pair("message", &self.message)
            .finish()
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let mut category = None;
        let mut message = None;
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "category" => category = Some(value.into_owned()),
                "message" => message = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            category: category?,
            message: message?,
        })
    }

    pub fn to_cookie(&self) -> String {
        build_cookie(FLASH_COOKIE, &self.encode(), None)
    }
}

/// Reads the pending flash message sent back by the browser, if any.
pub fn take_flash(headers: &HeaderMap) -> Option<Flash> {
    read_cookie(headers, FLASH_COOKIE).and_then(|raw| Flash::decode(&raw))
}

/// `303 See Other` to `to`, leaving a flash message for the next page.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    (
        AppendHeaders([(SET_COOKIE, flash.to_cookie())]),
        Redirect::to(to),
    )
        .into_response()
}

/// Renders a page as JSON: `{ "title", "flash", ...data }`.
///
/// A flash message present on the request is included once and its cookie
/// cleared.
pub fn render_page(headers: &HeaderMap, title: &str, data: Value) -> Response {
    render_page_with_status(headers, StatusCode::OK, title, data)
}

pub fn render_page_with_status(
    headers: &HeaderMap,
    status: StatusCode,
    title: &str,
    data: Value,
) -> Response {
    let flash = take_flash(headers);

    let mut body = Map::new();
    body.insert("title".to_string(), Value::String(title.to_string()));
    body.insert(
        "flash".to_string(),
        serde_json::to_value(&flash).unwrap_or(Value::Null),
    );
    if let Value::Object(fields) = data {
        body.extend(fields);
    }

    if flash.is_some() {
        (
            status,
            AppendHeaders([(SET_COOKIE, expired_cookie(FLASH_COOKIE))]),
            Json(Value::Object(body)),
        )
            .into_response()
    } else {
        (status, Json(Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn flash_survives_cookie_encoding() {
        let flash = Flash::success("Subject \"Algebra; I\" created successfully!");
        let encoded = flash.encode();

        assert!(!encoded.contains(';'));
        assert!(!encoded.contains(' '));
        assert_eq!(Flash::decode(&encoded), Some(flash));
    }

    #[test]
    fn incomplete_flash_is_ignored() {
        assert_eq!(Flash::decode("category=success"), None);
    }

    #[test]
    fn redirect_sets_flash_cookie() {
        let response = redirect_with_flash("/login", Flash::info("Please log in"));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=category=info&message=Please+log+in"));
    }

    #[test]
    fn rendered_page_consumes_flash() {
        let mut headers = HeaderMap::new();
        let cookie = format!("flash={}", Flash::danger("Access Denied!").encode());
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());

        let response = render_page(&headers, "Home", serde_json::json!({}));

        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cleared.contains("Max-Age=0"));
    }
}
