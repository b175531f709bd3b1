// src/routes.rs

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, courses, payment, progress, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, instructor_middleware},
};

const DEV_CLIENT_ORIGIN: &str = "http://localhost:5173";

fn cors_layer(client_url: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = [client_url, DEV_CLIENT_ORIGIN]
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Online Learning Platform API!" }))
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, courses, quizzes, progress, payment, admin).
/// * Protected routes go through `auth_middleware`; authoring and admin routes
///   additionally check the caller's role.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/profile", get(auth::profile))
                .layer(auth_layer.clone()),
        );

    let course_routes = Router::new()
        .route("/", get(courses::list_courses))
        .route("/{id}", get(courses::get_course))
        .merge(
            Router::new()
                .route("/instructor/my-courses", get(courses::my_courses))
                .route("/{id}/lessons", get(courses::list_lessons))
                .layer(auth_layer.clone()),
        )
        // Instructor-only: Auth first, then role check
        .merge(
            Router::new()
                .route("/", post(courses::create_course))
                .route("/{id}/lessons", post(courses::create_lesson))
                .layer(middleware::from_fn(instructor_middleware))
                .layer(auth_layer.clone()),
        );

    let quiz_routes = Router::new()
        .route("/submit", post(quiz::submit_quiz))
        .route("/{course_id}", get(quiz::get_course_quiz))
        .layer(auth_layer.clone())
        .merge(
            Router::new()
                .route("/", post(quiz::create_quiz))
                .layer(middleware::from_fn(instructor_middleware))
                .layer(auth_layer.clone()),
        );

    let progress_routes = Router::new()
        .route("/all", get(progress::all_progress))
        .route("/update", post(progress::update_progress))
        .layer(auth_layer.clone());

    let payment_routes = Router::new()
        .route("/create-checkout-session", post(payment::create_checkout_session))
        .layer(auth_layer.clone());

    let admin_routes = Router::new()
        .route("/stats", get(admin::stats))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    let cors = cors_layer(&state.config.client_url);

    Router::new()
        .route("/", get(welcome))
        .nest("/api/auth", auth_routes)
        .nest("/api/courses", course_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/progress", progress_routes)
        .nest("/api/payment", payment_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
