use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Actor, Engine, Role, UserNew};
use migration::MigratorTrait;
use server::{AuthConfig, ServerState, router};

const SECRET: &str = "test-secret";

/// Router over a fresh in-memory store with one admin account `boss`.
async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine
        .create_user(
            &Actor::new(0, "setup", Role::Admin),
            UserNew {
                name: "boss".to_string(),
                password: "secret1".to_string(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap();
    router(ServerState::new(engine, &AuthConfig::new(SECRET)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/consumables", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/consumables", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn register_then_login() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "sami", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");

    let token = login(&app, "sami", "secret1").await;
    let (status, body) = send(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "sami");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": "sami", "password": "wrong!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plain_user_cannot_edit_catalog() {
    let app = app().await;
    send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "sami", "password": "secret1" })),
    )
    .await;
    let token = login(&app, "sami", "secret1").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/consumables",
        Some(&token),
        Some(json!({ "name": "Bread", "price_minor": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn usage_flow_updates_summary() {
    let app = app().await;
    let token = login(&app, "boss", "secret1").await;

    let (status, bread) = send(
        &app,
        "POST",
        "/api/consumables",
        Some(&token),
        Some(json!({ "name": "Bread", "price_minor": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bread_id = bread["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/daily/consumables",
        Some(&token),
        Some(json!({
            "record_date": "2024-01-10",
            "consumable_id": bread_id,
            "start_count": 50,
            "end_count": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["usage"]["used_count"], 38);
    assert_eq!(body["reconciled"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/daily/earnings",
        Some(&token),
        Some(json!({
            "record_date": "2024-01-10",
            "total_earnings_minor": 120000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, earnings) = send(
        &app,
        "GET",
        "/api/daily/earnings/2024-01-10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(earnings["consumables_cost_minor"], 19000);
    assert_eq!(earnings["net_profit_minor"], 101000);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/consumables/{bread_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "GET",
        "/api/daily/summary/2024-13-40",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn leftovers_require_a_date() {
    let app = app().await;
    let token = login(&app, "boss", "secret1").await;

    let (status, _) = send(&app, "GET", "/api/leftovers", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "GET",
        "/api/leftovers?date=2024-01-10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bread_baguettes"], 0);
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app().await;
    let token = login(&app, "boss", "secret1").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/consumables")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"cheese\","))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "name": "boss" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn bad_path_id_is_json_400() {
    let app = app().await;
    let token = login(&app, "boss", "secret1").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/abc",
        Some(&token),
        Some(json!({ "role": "user" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
