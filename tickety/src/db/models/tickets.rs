//! Database models for tickets.

use crate::api::models::tickets::{Priority, Status, TicketCreate, TicketUpdate};
use crate::types::{TicketId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a ticket. The store assigns the id, timestamp and status.
#[derive(Debug, Clone)]
pub struct TicketCreateDBRequest {
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TicketCreateDBRequest {
    pub fn new(owner_id: UserId, create: TicketCreate) -> Self {
        Self {
            owner_id,
            title: create.title,
            description: create.description,
            priority: create.priority,
        }
    }
}

/// Database request for updating a ticket. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl From<TicketUpdate> for TicketUpdateDBRequest {
    fn from(update: TicketUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            priority: update.priority,
            status: update.status,
        }
    }
}

/// Database response for a ticket, joined with the owner's username
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDBResponse {
    pub ticket_id: TicketId,
    pub owner_id: UserId,
    pub owner_username: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}
