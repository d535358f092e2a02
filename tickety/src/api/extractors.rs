//! Request extractors that report their failures through [`Error`].
//!
//! axum's own `Json` and `Path` reject with plain-text bodies and a variety of status codes.
//! These wrappers turn every rejection into a `400` with the usual `{"error": ...}` body.
//!
//! ```ignore
//! async fn handler(JsonBody(payload): JsonBody<Value>, PathParam(id): PathParam<TicketId>) { ... }
//! ```

use crate::errors::Error;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body. Malformed, missing, or non-JSON bodies become
/// "Invalid or missing JSON data".
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// A single path parameter, e.g. the numeric id in `/tickets/{id}`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);
