// tests/db_tests.rs

//! End-to-end tests against a real PostgreSQL database.
//!
//! They need `DATABASE_URL`; without it each test logs a note and returns.

use std::{collections::BTreeSet, sync::Arc};

use learnhub::{
    config::Config,
    routes,
    services::{
        grading::AnswerKeySource, payment::StripeGateway, progress::LessonCourseResolver,
    },
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Spawns the app on a random port.
/// Returns the base URL and the pool, or `None` when no database is configured.
async fn spawn_app() -> Option<(String, PgPool)> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        client_url: "http://localhost:5173".to_string(),
        stripe_secret_key: None,
        stripe_api_base: "http://127.0.0.1:1".to_string(),
        admin_email: None,
        admin_password: None,
    };

    let payments = Arc::new(StripeGateway::new(
        reqwest::Client::new(),
        config.stripe_api_base.clone(),
        None,
    ));

    let app = routes::create_router(AppState {
        pool: pool.clone(),
        config,
        payments,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some((format!("http://127.0.0.1:{}", port), pool))
}

/// Signs up a fresh user, optionally promotes it, and returns its token.
async fn login_as(address: &str, pool: &PgPool, role: &str) -> String {
    let client = reqwest::Client::new();
    let email = format!("u_{}@example.com", uuid::Uuid::new_v4().simple());

    let response = client
        .post(format!("{}/api/auth/signup", address))
        .json(&json!({ "email": email, "password": "password123", "fullName": "Test User" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    sqlx::query("UPDATE users SET role = $1 WHERE email = $2")
        .bind(role)
        .bind(&email)
        .execute(pool)
        .await
        .expect("Failed to set role");

    let body: Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    body["token"].as_str().expect("login returned no token").to_string()
}

/// Creates a course with one lesson as `token`. Returns (course_id, lesson_id).
async fn course_with_lesson(address: &str, token: &str) -> (i64, i64) {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/courses", address))
        .bearer_auth(token)
        .json(&json!({ "title": "Rust 101", "description": "<p>Ownership</p>" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    let course: Value = response.json().await.unwrap();
    let course_id = course["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/api/courses/{}/lessons", address, course_id))
        .bearer_auth(token)
        .json(&json!({ "title": "Borrowing" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    let lesson: Value = response.json().await.unwrap();

    (course_id, lesson["id"].as_i64().unwrap())
}

async fn create_quiz(address: &str, token: &str, course_id: i64, questions: Value) -> Value {
    let response = reqwest::Client::new()
        .post(format!("{}/api/quizzes", address))
        .bearer_auth(token)
        .json(&json!({ "courseId": course_id, "title": "Week 1", "questions": questions }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.unwrap()
}

async fn submit(address: &str, token: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/quizzes/submit", address))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

fn mentions_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k == key || mentions_key(v, key)),
        Value::Array(items) => items.iter().any(|v| mentions_key(v, key)),
        _ => false,
    }
}

#[tokio::test]
async fn quiz_flow_hides_answers_and_grades_server_side() {
    let Some((address, pool)) = spawn_app().await else {
        return;
    };
    let instructor = login_as(&address, &pool, "instructor").await;
    let student = login_as(&address, &pool, "student").await;
    let (course_id, _) = course_with_lesson(&address, &instructor).await;

    create_quiz(
        &address,
        &instructor,
        course_id,
        json!([
            { "questionText": "2 + 2?", "options": ["3", "4"], "correctAnswer": 1 },
            { "questionText": "Borrow checker?", "options": ["yes", "no"], "correctAnswer": 0 },
            { "questionText": "Pick c", "options": ["a", "b", "c"], "correctAnswer": 2 },
        ]),
    )
    .await;

    // Learner view
    let response = reqwest::Client::new()
        .get(format!("{}/api/quizzes/{}", address, course_id))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let quiz: Value = response.json().await.unwrap();
    assert!(!mentions_key(&quiz, "correct_answer"));
    assert!(!mentions_key(&quiz, "correctAnswer"));

    let quiz_id = quiz["id"].as_i64().unwrap();
    let ids: Vec<i64> = quiz["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);

    // Empty submission
    let response = submit(&address, &student, json!({ "quizId": quiz_id, "answers": {} })).await;
    assert_eq!(response.status().as_u16(), 200);
    let score: Value = response.json().await.unwrap();
    assert_eq!(score, json!({ "score": 0, "total": 3 }));

    // Partial submission with a numeric string and a junk key
    let mut answers = serde_json::Map::new();
    answers.insert(ids[0].to_string(), json!(1));
    answers.insert(ids[2].to_string(), json!("2"));
    answers.insert("q1".to_string(), json!(0));
    let response = submit(&address, &student, json!({ "quizId": quiz_id, "answers": answers })).await;
    assert_eq!(response.status().as_u16(), 200);
    let score: Value = response.json().await.unwrap();
    assert_eq!(score, json!({ "score": 2, "total": 3 }));
}

#[tokio::test]
async fn unknown_quiz_is_404_with_json_body() {
    let Some((address, pool)) = spawn_app().await else {
        return;
    };
    let student = login_as(&address, &pool, "student").await;

    for answers in [json!({}), json!({ "1": 0 })] {
        let response = submit(&address, &student, json!({ "quizId": i64::MAX, "answers": answers })).await;
        assert_eq!(response.status().as_u16(), 404);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn completing_a_lesson_twice_is_idempotent() {
    let Some((address, pool)) = spawn_app().await else {
        return;
    };
    let instructor = login_as(&address, &pool, "instructor").await;
    let student = login_as(&address, &pool, "student").await;
    let (course_id, lesson_id) = course_with_lesson(&address, &instructor).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/progress/update", address))
            .bearer_auth(&student)
            .json(&json!({ "lesson_id": lesson_id }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
    }

    let progress: Value = client
        .get(format!("{}/api/progress/all", address))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let mut expected = serde_json::Map::new();
    expected.insert(course_id.to_string(), json!([lesson_id]));
    assert_eq!(progress, Value::Object(expected));
}

#[tokio::test]
async fn duplicate_signup_is_conflict() {
    let Some((address, _pool)) = spawn_app().await else {
        return;
    };
    let client = reqwest::Client::new();
    let body = json!({
        "email": format!("dup_{}@example.com", uuid::Uuid::new_v4().simple()),
        "password": "password123",
        "fullName": "Dup User",
    });

    let first = client
        .post(format!("{}/api/auth/signup", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    let second = client
        .post(format!("{}/api/auth/signup", address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(first.status().as_u16(), 201);
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn answer_source_separates_missing_and_empty_quizzes() {
    let Some((address, pool)) = spawn_app().await else {
        return;
    };
    let instructor = login_as(&address, &pool, "instructor").await;
    let (course_id, _) = course_with_lesson(&address, &instructor).await;
    let quiz = create_quiz(&address, &instructor, course_id, json!([])).await;
    let quiz_id = quiz["id"].as_i64().unwrap();

    assert_eq!(pool.question_count(quiz_id).await.unwrap(), Some(0));
    assert_eq!(pool.authoritative_answers(quiz_id).await.unwrap(), Some(vec![]));
    assert_eq!(pool.question_count(i64::MAX).await.unwrap(), None);
    assert_eq!(pool.authoritative_answers(i64::MAX).await.unwrap(), None);
}

#[tokio::test]
async fn resolver_omits_unknown_lessons() {
    let Some((address, pool)) = spawn_app().await else {
        return;
    };
    let instructor = login_as(&address, &pool, "instructor").await;
    let (course_id, lesson_id) = course_with_lesson(&address, &instructor).await;

    let ids = BTreeSet::from([lesson_id, i64::MAX]);
    let resolved = pool.resolve_courses(&ids).await.unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved.get(&lesson_id), Some(&course_id));
}
