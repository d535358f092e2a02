//! Common type definitions shared across the crate.
//!
//! This module defines:
//! - Type aliases for entity IDs ([`UserId`], [`TicketId`])
//! - The [`Operation`] enum used by the access-control rules and permission errors
//!
//! # ID Types
//!
//! Users are keyed by UUIDs. Tickets use a numeric, store-assigned identifier that only ever
//! increases, so ticket ids are never reused even after a delete.

use std::fmt;
use uuid::Uuid;

pub type UserId = Uuid;
pub type TicketId = i64;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Operations that can be performed on tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::List => write!(f, "list"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}
