//! API request/response models for tickets.
//!
//! Request bodies for create and update are not deserialized directly into these types: they
//! arrive as raw JSON objects and are checked field by field in [`crate::tickets::validation`],
//! which produces [`TicketCreate`] and [`TicketUpdate`]. The types still derive `Deserialize`
//! so the OpenAPI document can describe the accepted payloads.

use crate::db::models::tickets::TicketDBResponse;
use crate::types::TicketId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "ticket_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

/// Lifecycle state of a ticket. New tickets always start `open`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "in progress")]
    #[sqlx(rename = "in progress")]
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Open, Status::InProgress, Status::Resolved, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// A validated ticket creation request. The caller becomes the owner; status is always `open`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TicketCreate {
    #[schema(example = "Printer on fire")]
    pub title: String,
    #[schema(example = "The office printer is emitting smoke")]
    pub description: String,
    pub priority: Priority,
}

/// A validated partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl TicketUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub ticket_id: TicketId,
    /// Username of the ticket owner
    #[schema(example = "alice")]
    pub owner: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl From<TicketDBResponse> for TicketResponse {
    fn from(db: TicketDBResponse) -> Self {
        Self {
            ticket_id: db.ticket_id,
            owner: db.owner_username,
            title: db.title,
            description: db.description,
            priority: db.priority,
            status: db.status,
            created_at: db.created_at,
        }
    }
}

/// Response body for a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketDeleteResponse {
    pub message: String,
    pub ticket_id: TicketId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in progress\"");
        assert_eq!(Status::parse("in progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in_progress"), None);
        assert_eq!(Status::default(), Status::Open);
    }

    #[test]
    fn test_as_str_matches_serde_names() {
        for priority in Priority::ALL {
            assert_eq!(serde_json::to_value(priority).unwrap(), priority.as_str());
        }
        for status in Status::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }

    #[test]
    fn test_priority_parse_is_exact() {
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse("High"), None);
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn test_empty_update() {
        assert!(TicketUpdate::default().is_empty());
        let update = TicketUpdate {
            status: Some(Status::Closed),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
