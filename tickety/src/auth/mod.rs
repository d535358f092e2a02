//! Authentication and authorization.
//!
//! # Authentication
//!
//! Clients log in via `POST /login` with a username and password and receive a signed session
//! token (HS256 JWT). Every protected request passes it back as `Authorization: Bearer <token>`.
//! The [`CurrentUser`](crate::api::models::users::CurrentUser) extractor verifies the token and
//! re-reads the user from the credential store on each request.
//!
//! # Authorization
//!
//! Ticket access is decided by the caller's role (`client` or `admin`) and whether they own the
//! ticket. See [`permissions`] for the rule table.
//!
//! # Modules
//!
//! - [`current_user`]: The extractor that authenticates requests
//! - [`password`]: Password hashing and verification using Argon2
//! - [`permissions`]: Role and ownership rules
//! - [`session`]: Session token creation and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use tickety::api::models::users::CurrentUser;
//!
//! async fn protected_handler(current_user: CurrentUser) -> String {
//!     format!("Hello, {}!", current_user.username)
//! }
//! ```

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
