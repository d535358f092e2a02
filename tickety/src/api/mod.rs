//! API layer for HTTP request handling and data models.
//!
//! - **[`extractors`]**: `Json` and `Path` wrappers that reject with the API's error body
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/register`, `/login`): Account creation and session tokens
//! - **Users** (`/me`): The authenticated caller
//! - **Tickets** (`/tickets`, `/tickets/{id}`): Support tickets, scoped by role and ownership
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa`. The document is served at
//! `/api-docs/openapi.json` and rendered at `/docs` when the server is running.

pub mod extractors;
pub mod handlers;
pub mod models;
