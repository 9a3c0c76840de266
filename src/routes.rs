// src/routes.rs

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, dashboard, pages, quiz, subject},
    state::AppState,
    utils::session::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public pages, registration, login and dashboards.
/// * Quiz attempts, which need a logged-in session to record scores.
/// * Content management, which needs an admin session.
/// * Applies global middleware (Trace) and injects the shared state.
pub fn create_router(state: AppState) -> Router {
    let public_routes: Router<AppState> = Router::new()
        .route("/", get(pages::home).post(pages::home))
        .route("/home", get(pages::home).post(pages::home))
        .route("/about", get(pages::about))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/admin/{id}", get(dashboard::admin_dashboard))
        .route("/user/{id}", get(dashboard::user_dashboard));

    // Browsing a quiz is open; submitting one needs a session.
    let attempt_routes: Router<AppState> = Router::new().route(
        "/attempt_quiz",
        get(quiz::attempt_quiz_page).merge(post(quiz::attempt_quiz).route_layer(
            middleware::from_fn_with_state(state.clone(), auth_middleware),
        )),
    );

    let admin_routes: Router<AppState> = Router::new()
        .route(
            "/create_subject",
            get(subject::create_subject_page).post(subject::create_subject),
        )
        .route("/manage_subjects", get(subject::manage_subjects))
        .route(
            "/create_quiz",
            get(quiz::create_quiz_page).post(quiz::create_quiz),
        )
        .route(
            "/create_question",
            get(quiz::create_question_page).post(quiz::create_question),
        )
        // Auth first, then the admin check
        .route_layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
                .layer(middleware::from_fn(admin_middleware)),
        );

    Router::new()
        .merge(public_routes)
        .merge(attempt_routes)
        .merge(admin_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
