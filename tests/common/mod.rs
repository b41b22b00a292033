#![allow(dead_code)]

use reqwest::Client;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
static CATEGORY_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const TEST_PASSWORD: &str = "test_password_123";

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // Cheap hashing keeps registration fast.
        std::env::set_var("BCRYPT_COST", "4");
        let config = agora::config::jwt::JwtConfig::from_env().unwrap();
        let _ = agora::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.addr, path)
    }
}

/// Fresh database (in-memory SQLite unless `TEST_DATABASE_URL` is set) behind the real router.
pub async fn spawn_app() -> TestApp {
    init_env();

    let url = std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db_config = agora::config::database::DatabaseConfig {
        url,
        max_connections: 5,
        min_connections: 1,
    };
    let db = agora::config::database::connect(&db_config)
        .await
        .expect("Failed to connect to test database");

    agora::migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let app = agora::create_app(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        addr: format!("http://{}", addr),
        db,
        client: Client::new(),
    }
}

/// Register a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("{}_{}", username_prefix, counter);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": username,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse register response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to register user '{}': status={}, body={}", username, status, body);
    }

    let user_id = body["data"]["user"]["id"]
        .as_i64()
        .expect("Register response missing user id") as i32;
    let token = body["data"]["token"]
        .as_str()
        .expect("Register response missing token")
        .to_string();
    (user_id, token)
}

/// Create a category and return its id.
pub async fn create_category(app: &TestApp, token: &str) -> i32 {
    let counter = CATEGORY_COUNTER.fetch_add(1, Ordering::SeqCst);

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "name": format!("Test Category {}", counter),
            "description": "A test category"
        }))
        .send()
        .await
        .expect("Failed to create category");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create category: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("Category response missing id") as i32
}

/// Create a thread and return its id.
pub async fn create_thread(app: &TestApp, token: &str, category_id: i32, title: &str) -> i32 {
    let body = post_json(
        app,
        token,
        "/threads",
        serde_json::json!({
            "title": title,
            "category_id": category_id,
            "content": "Thread body"
        }),
    )
    .await;
    body["data"]["id"].as_i64().expect("Thread response missing id") as i32
}

/// Create a post and return its id.
pub async fn create_post(
    app: &TestApp,
    token: &str,
    thread_id: i32,
    parent_post_id: Option<i32>,
    content: &str,
) -> i32 {
    let body = post_json(
        app,
        token,
        "/posts",
        serde_json::json!({
            "thread_id": thread_id,
            "content": content,
            "parent_post_id": parent_post_id
        }),
    )
    .await;
    body["data"]["id"].as_i64().expect("Post response missing id") as i32
}

/// Cast a vote and return the raw response.
pub async fn vote(app: &TestApp, token: &str, post_id: i32, value: i16) -> reqwest::Response {
    app.client
        .post(app.url("/votes"))
        .bearer_auth(token)
        .json(&serde_json::json!({ "post_id": post_id, "value": value }))
        .send()
        .await
        .expect("Failed to send vote")
}

pub async fn get_json(app: &TestApp, path: &str) -> Value {
    let resp = app
        .client
        .get(app.url(path))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), 200, "GET {path} failed");
    resp.json().await.expect("Failed to parse response")
}

async fn post_json(app: &TestApp, token: &str, path: &str, payload: Value) -> Value {
    let resp = app
        .client
        .post(app.url(path))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse response");
    if !body["success"].as_bool().unwrap_or(false) {
        panic!("POST {} failed: status={}, body={}", path, status, body);
    }
    body
}
