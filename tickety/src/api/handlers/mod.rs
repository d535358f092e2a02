//! HTTP request handlers for all API endpoints.
//!
//! Handlers are thin: they extract the caller and the request body, delegate to
//! [`crate::tickets::TicketManager`] or the credential store, and serialize the result.
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration and login
//! - [`tickets`]: Ticket CRUD
//! - [`users`]: The current user's profile
//!
//! # Authentication
//!
//! Protected handlers take a [`CurrentUser`](crate::api::models::users::CurrentUser) argument,
//! which rejects the request with `401` before the handler body runs.
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which converts to the matching HTTP status code and
//! a `{"error": ...}` JSON body.

pub mod auth;
pub mod tickets;
pub mod users;
