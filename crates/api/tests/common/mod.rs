#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::FixedOffset;
use crmboard_api::auth::jwt::{generate_access_token, JwtConfig};
use crmboard_api::config::ServerConfig;
use crmboard_api::router::build_app_router;
use crmboard_api::state::AppState;
use crmboard_core::roles::Role;
use crmboard_core::types::DbId;
use crmboard_db::models::user::CreateUser;
use crmboard_db::repositories::UserRepo;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and a UTC calendar.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        calendar_offset: FixedOffset::east_opt(0).unwrap(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_with_token(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role and return a valid bearer token for it.
pub async fn user_with_token(pool: &PgPool, role: Role) -> (DbId, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: format!("{role} user"),
            email: format!("{role}@example.com"),
            role,
        },
    )
    .await
    .unwrap();
    let config = test_config();
    let token = generate_access_token(user.id, role.as_str(), &config.jwt).unwrap();
    (user.id, token)
}

/// A project created through the API: its id and default column ids in
/// display order (`A Fazer`, `Em Andamento`, `Concluído`).
pub struct ProjectFixture {
    pub id: DbId,
    pub todo: DbId,
    pub doing: DbId,
    pub done: DbId,
}

pub async fn create_project(pool: &PgPool, body: Value) -> ProjectFixture {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/projects", body).await;
    assert_eq!(response.status(), 201);
    let json = body_json(response).await;
    let columns = json["columns"].as_array().unwrap();
    ProjectFixture {
        id: json["id"].as_i64().unwrap(),
        todo: columns[0]["id"].as_i64().unwrap(),
        doing: columns[1]["id"].as_i64().unwrap(),
        done: columns[2]["id"].as_i64().unwrap(),
    }
}

/// Create a card through the API and return its JSON.
pub async fn create_card(pool: &PgPool, project_id: DbId, column_id: DbId, title: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/cards",
        serde_json::json!({
            "project_id": project_id,
            "column_id": column_id,
            "title": title,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await
}
