// tests/common/mod.rs

#![allow(dead_code)]

use std::net::SocketAddr;

use quizhub::{config::Config, db, routes, state::AppState, utils::flash::Flash};
use reqwest::{Response, header::SET_COOKIE};
use sqlx::SqlitePool;

pub const SESSION_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        session_secret: SESSION_SECRET.to_string(),
        session_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        static_dir: "static".to_string(),
        admin_username: None,
        admin_email: None,
        admin_password: None,
    }
}

/// Spawns the app on a random port, backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let config = test_config();

    let pool = db::connect_with_retry(&config)
        .await
        .expect("Failed to open in-memory SQLite");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool.clone(), config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Redirects are asserted on, never followed.
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        pool,
        client,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str, role: &str) -> Response {
        self.client
            .post(self.url("/register"))
            .form(&[
                ("username", username),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
                ("role", role),
            ])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password), ("role", role)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Registers and logs in, returning the `Cookie` header value of the session.
    pub async fn login_as(&self, username: &str, role: &str) -> String {
        let email = format!("{}@x.com", username);
        let register = self.register(username, &email, "secret1", role).await;
        assert_eq!(register.status().as_u16(), 303);

        let login = self.login(&email, "secret1", role).await;
        let token = session_token(&login).expect("login did not set a session");
        format!("session={}", token)
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> Response {
        self.client
            .get(self.url(path))
            .header("Cookie", cookie)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn user_id(&self, username: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("user not found")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

fn cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .and_then(|v| v[prefix.len()..].split(';').next())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The session token set by a response, if any.
pub fn session_token(response: &Response) -> Option<String> {
    cookie_value(response, "session")
}

/// The flash message set by a response, if any.
pub fn flash_of(response: &Response) -> Option<Flash> {
    cookie_value(response, "flash").and_then(|raw| Flash::decode(&raw))
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
