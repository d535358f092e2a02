//! Test utilities for integration testing (available with `test-utils` feature).

use crate::{
    AppState, Application,
    api::models::{auth::LoginResponse, users::Role},
    auth::password::{self, Argon2Params},
    config::{Config, DatabaseConfig, PasswordConfig},
    db::{
        memory::{MemoryTickets, MemoryUsers},
        models::users::{UserCreateDBRequest, UserDBResponse},
    },
};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

/// Argon2 parameters that keep hashing in tests fast
const TEST_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 8,
    iterations: 1,
    parallelism: 1,
};

pub fn create_test_config() -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        enable_metrics: false,
        ..Default::default()
    };
    config.auth.password = PasswordConfig {
        argon2_memory_kib: TEST_ARGON2.memory_kib,
        argon2_iterations: TEST_ARGON2.iterations,
        argon2_parallelism: TEST_ARGON2.parallelism,
    };
    config
}

/// State over a fresh in-memory store, for tests that call handlers or managers directly
pub fn create_test_state() -> AppState {
    let users = Arc::new(MemoryUsers::new());
    let tickets = Arc::new(MemoryTickets::new(users.clone()));
    let dummy_password_hash =
        password::hash_string_with_params("tickety-dummy-password", Some(TEST_ARGON2)).expect("Failed to hash dummy password");

    AppState::builder()
        .config(create_test_config())
        .users(users)
        .tickets(tickets)
        .dummy_password_hash(dummy_password_hash)
        .build()
}

/// The full router over the in-memory store, plus the state behind it
pub fn create_test_app() -> (TestServer, AppState) {
    let state = create_test_state();
    let router = crate::build_router(&state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, state)
}

/// Build a test server the same way `main` does, from a config
pub async fn create_test_application(config: Config) -> (TestServer, AppState) {
    Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

pub async fn create_test_user(state: &AppState, username: &str, password: &str, role: Role) -> UserDBResponse {
    let password_hash = password::hash_string_with_params(password, Some(TEST_ARGON2)).expect("Failed to hash password");
    state
        .users
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
            role,
        })
        .await
        .expect("Failed to create test user")
}

/// Log in through the API and return the session token
pub async fn login_token(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({"username": username, "password": password}))
        .await;
    response.assert_status_ok();
    response.json::<LoginResponse>().token
}
