//! API request and response data models.
//!
//! These types define the public JSON contract and are kept separate from the store records in
//! [`crate::db::models`], so the two can evolve independently. All of them derive `utoipa`
//! schemas for the OpenAPI document.
//!
//! - [`auth`]: Registration and login payloads
//! - [`users`]: Roles, the authenticated caller, and the `/me` response
//! - [`tickets`]: Ticket enums, validated create/update requests, and responses

pub mod auth;
pub mod tickets;
pub mod users;
