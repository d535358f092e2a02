use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Map, Value};

use crate::{
    AppState,
    api::{
        extractors::{JsonBody, PathParam},
        models::{
            tickets::{TicketCreate, TicketDeleteResponse, TicketResponse, TicketUpdate},
            users::CurrentUser,
        },
    },
    errors::{Error, Result},
    types::TicketId,
};

/// Ticket payloads must be JSON objects; anything else is treated like a malformed body
fn into_object(payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(Error::bad_request("Invalid or missing JSON data")),
    }
}

/// Create a ticket owned by the caller
#[utoipa::path(
    post,
    path = "/tickets",
    request_body = TicketCreate,
    tag = "tickets",
    responses(
        (status = 201, description = "Ticket created", body = TicketResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    JsonBody(payload): JsonBody<Value>,
) -> Result<(StatusCode, Json<TicketResponse>)> {
    let payload = into_object(payload)?;
    let ticket = state.ticket_manager().create(&current_user, &payload).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets: all of them for admins, the caller's own for clients
#[utoipa::path(
    get,
    path = "/tickets",
    tag = "tickets",
    responses(
        (status = 200, description = "Tickets in id order", body = [TicketResponse]),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_tickets(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<TicketResponse>>> {
    Ok(Json(state.ticket_manager().list(&current_user).await?))
}

#[utoipa::path(
    get,
    path = "/tickets/{id}",
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket", body = TicketResponse),
        (status = 400, description = "Non-numeric ticket ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller does not own the ticket"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    PathParam(id): PathParam<TicketId>,
) -> Result<Json<TicketResponse>> {
    Ok(Json(state.ticket_manager().get(&current_user, id).await?))
}

/// Partially update a ticket. Only the fields present in the body change.
#[utoipa::path(
    patch,
    path = "/tickets/{id}",
    request_body = TicketUpdate,
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Updated ticket", body = TicketResponse),
        (status = 400, description = "Invalid field value"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller does not own the ticket"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    PathParam(id): PathParam<TicketId>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<TicketResponse>> {
    let payload = into_object(payload)?;
    Ok(Json(state.ticket_manager().update(&current_user, id, &payload).await?))
}

/// Delete a ticket (admin only)
#[utoipa::path(
    delete,
    path = "/tickets/{id}",
    tag = "tickets",
    params(("id" = i64, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket deleted", body = TicketDeleteResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    PathParam(id): PathParam<TicketId>,
) -> Result<Json<TicketDeleteResponse>> {
    state.ticket_manager().delete(&current_user, id).await?;
    Ok(Json(TicketDeleteResponse {
        message: "Ticket deleted successfully".to_string(),
        ticket_id: id,
    }))
}
