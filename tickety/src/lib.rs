//! # tickety: Multi-tenant Support Tickets
//!
//! `tickety` is an HTTP service where users register, log in, and manage support tickets.
//! Every ticket belongs to the user who opened it. Clients can only see and edit their own
//! tickets; admins can see, edit and delete all of them.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer.
//! Persistence is behind two store traits ([`db::handlers::Users`] and
//! [`db::handlers::TicketRepository`]), implemented for PostgreSQL and for an in-process
//! backend that is the default and is used by the test suite.
//!
//! ### Request Flow
//!
//! A request to a protected route first passes the authentication gate: the
//! [`CurrentUser`](api::models::users::CurrentUser) extractor verifies the bearer session token
//! and re-reads the user from the credential store. The handler then calls
//! [`tickets::TicketManager`], which resolves the ticket, applies the rules in
//! [`auth::permissions`], validates the payload, and makes a single store call.
//!
//! ### Core Components
//!
//! - [`api`]: Route handlers, request/response models and extractors
//! - [`auth`]: Session tokens, password hashing, and access rules
//! - [`tickets`]: Ticket operations with access control and validation
//! - [`db`]: Store traits and their PostgreSQL and in-memory implementations
//! - [`config`]: Layered YAML and environment configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use tickety::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = tickety::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     tickety::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod tickets;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::password::{self, Argon2Params},
    db::{
        handlers::{PgTickets, PgUsers, TicketRepository, Users},
        memory::{MemoryTickets, MemoryUsers},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    openapi::ApiDoc,
    tickets::TicketManager,
};
use axum::{
    Json, Router,
    http::{self, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use serde_json::json;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{TicketId, UserId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .users(users)
///     .tickets(tickets)
///     .dummy_password_hash(hash)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn Users>,
    pub tickets: Arc<dyn TicketRepository>,
    /// Verified against on logins for unknown usernames, so those cost as much as a wrong password
    pub dummy_password_hash: String,
}

impl AppState {
    pub fn ticket_manager(&self) -> TicketManager {
        TicketManager::new(self.tickets.clone())
    }
}

/// Get the tickety database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Make sure the configured admin account exists.
///
/// Idempotent: creates the user with the admin role if it does not exist, otherwise promotes the
/// existing user to admin and resets its password.
#[instrument(skip_all, fields(username = %username))]
pub async fn seed_admin_user(users: &dyn Users, username: &str, password: &str, params: Argon2Params) -> anyhow::Result<UserId> {
    let password_hash = password::hash_password(password.to_string(), params)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    if let Some(existing) = users.get_by_username(username).await? {
        let update = UserUpdateDBRequest {
            password_hash: Some(password_hash),
            role: Some(Role::Admin),
        };
        users.update(existing.id, &update).await?;
        info!("Promoted existing user {username} to admin");
        return Ok(existing.id);
    }

    let created = users
        .create(&UserCreateDBRequest {
            username: username.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!("Created admin user {username}");
    Ok(created.id)
}

/// The stores selected by `config.database`, plus the pool backing them if any
struct Stores {
    users: Arc<dyn Users>,
    tickets: Arc<dyn TicketRepository>,
    pool: Option<PgPool>,
}

async fn setup_stores(config: &Config) -> anyhow::Result<Stores> {
    match &config.database {
        config::DatabaseConfig::Memory => {
            info!("Using in-memory store; data will be lost on shutdown");
            let users = Arc::new(MemoryUsers::new());
            let tickets = Arc::new(MemoryTickets::new(users.clone()));
            Ok(Stores {
                users,
                tickets,
                pool: None,
            })
        }
        config::DatabaseConfig::External { url, pool: settings } => {
            info!("Using external database");
            let mut options = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .min_connections(settings.min_connections)
                .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));
            // Zero disables the timeout
            if settings.idle_timeout_secs > 0 {
                options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
            }
            if settings.max_lifetime_secs > 0 {
                options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
            }

            let pool = options.connect(url).await?;
            migrator().run(&pool).await?;

            Ok(Stores {
                users: Arc::new(PgUsers::new(pool.clone())),
                tickets: Arc::new(PgTickets::new(pool.clone())),
                pool: Some(pool),
            })
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allowed = &config.cors.allowed_origins;
    let origins = if allowed.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in allowed {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Route not found" })))
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": "Method not allowed" })))
}

/// Build the application router with all endpoints and middleware.
///
/// Adds the Prometheus metrics endpoint when `enable_metrics` is set.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, tickets, users};

    let router = Router::new()
        .route("/", get(|| async { "Hello, Tickety!" }))
        .route("/healthz", get(|| async { "OK" }))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(users::get_current_user))
        .route("/tickets", post(tickets::create_ticket).get(tickets::list_tickets))
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket).patch(tickets::update_ticket).delete(tickets::delete_ticket),
        )
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed);

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    app_state: AppState,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting tickety with configuration: {:#?}", config);

        let stores = setup_stores(&config).await?;
        let params = Argon2Params::from(&config.auth.password);

        if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
            seed_admin_user(stores.users.as_ref(), username, password, params).await?;
        }

        let dummy_password_hash = password::hash_password("tickety-dummy-password".to_string(), params).await?;

        let app_state = AppState::builder()
            .config(config.clone())
            .users(stores.users)
            .tickets(stores.tickets)
            .dummy_password_hash(dummy_password_hash)
            .build();

        let router = build_router(&app_state)?;

        Ok(Self {
            router,
            app_state,
            config,
            pool: stores.pool,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> (axum_test::TestServer, AppState) {
        let server = axum_test::TestServer::new(self.router).expect("Failed to create test server");
        (server, self.app_state)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Tickety listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}
