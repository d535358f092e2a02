//! In-process store backend.
//!
//! Used when no external database is configured, and by the test suite. Each store keeps its
//! state behind a single lock so every operation is atomic with respect to the others.

use crate::{
    api::models::tickets::{Priority, Status},
    db::{
        errors::{DbError, Result},
        handlers::{repository::Repository, tickets::TicketFilter, users::Users},
        models::{
            tickets::{TicketCreateDBRequest, TicketDBResponse, TicketUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
    },
    types::{TicketId, UserId},
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct UserTable {
    by_id: HashMap<UserId, UserDBResponse>,
    by_username: HashMap<String, UserId>,
}

/// In-memory [`Users`]
#[derive(Debug, Default)]
pub struct MemoryUsers {
    state: RwLock<UserTable>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Users for MemoryUsers {
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut table = self.state.write().await;
        if table.by_username.contains_key(&request.username) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_username_unique".to_string()),
                table: Some("users".to_string()),
                message: format!("username '{}' already exists", request.username),
            });
        }

        let user = UserDBResponse {
            id: Uuid::new_v4(),
            username: request.username.clone(),
            password_hash: request.password_hash.clone(),
            role: request.role,
            created_at: Utc::now(),
        };
        table.by_username.insert(user.username.clone(), user.id);
        table.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.state.read().await.by_id.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        let table = self.state.read().await;
        Ok(table.by_username.get(username).and_then(|id| table.by_id.get(id)).cloned())
    }

    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<Option<UserDBResponse>> {
        let mut table = self.state.write().await;
        let Some(user) = table.by_id.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(hash) = &request.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        Ok(Some(user.clone()))
    }
}

#[derive(Debug)]
struct StoredTicket {
    owner_id: UserId,
    title: String,
    description: String,
    priority: Priority,
    status: Status,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct TicketTable {
    next_id: TicketId,
    rows: BTreeMap<TicketId, StoredTicket>,
}

impl Default for TicketTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// In-memory ticket repository.
///
/// Ids come from a counter that is never rewound, so deleted ids are not reused. Owner usernames
/// are resolved against the user store on every read, like the join in the Postgres backend.
#[derive(Debug)]
pub struct MemoryTickets {
    users: Arc<MemoryUsers>,
    state: RwLock<TicketTable>,
}

impl MemoryTickets {
    pub fn new(users: Arc<MemoryUsers>) -> Self {
        Self {
            users,
            state: RwLock::new(TicketTable::default()),
        }
    }

    async fn owner_username(&self, owner_id: UserId) -> Result<String> {
        self.users
            .get_by_id(owner_id)
            .await?
            .map(|u| u.username)
            .ok_or_else(|| DbError::ForeignKeyViolation {
                constraint: Some("tickets_owner_id_fkey".to_string()),
                table: Some("tickets".to_string()),
                message: format!("owner {owner_id} does not exist"),
            })
    }

    async fn to_response(&self, ticket_id: TicketId, ticket: &StoredTicket) -> Result<TicketDBResponse> {
        Ok(TicketDBResponse {
            ticket_id,
            owner_id: ticket.owner_id,
            owner_username: self.owner_username(ticket.owner_id).await?,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            created_at: ticket.created_at,
        })
    }
}

#[async_trait::async_trait]
impl Repository for MemoryTickets {
    type CreateRequest = TicketCreateDBRequest;
    type UpdateRequest = TicketUpdateDBRequest;
    type Response = TicketDBResponse;
    type Id = TicketId;
    type Filter = TicketFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let owner_username = self.owner_username(request.owner_id).await?;

        let mut table = self.state.write().await;
        let ticket_id = table.next_id;
        table.next_id += 1;

        let ticket = StoredTicket {
            owner_id: request.owner_id,
            title: request.title.clone(),
            description: request.description.clone(),
            priority: request.priority,
            status: Status::Open,
            created_at: Utc::now(),
        };
        let response = TicketDBResponse {
            ticket_id,
            owner_id: ticket.owner_id,
            owner_username,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            created_at: ticket.created_at,
        };
        table.rows.insert(ticket_id, ticket);
        Ok(response)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let table = self.state.read().await;
        match table.rows.get(&id) {
            Some(ticket) => Ok(Some(self.to_response(id, ticket).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let table = self.state.read().await;
        let mut tickets = Vec::new();
        for (id, ticket) in table.rows.iter() {
            if filter.owner_id.is_some_and(|owner| owner != ticket.owner_id) {
                continue;
            }
            tickets.push(self.to_response(*id, ticket).await?);
        }
        Ok(tickets)
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        Ok(self.state.write().await.rows.remove(&id).is_some())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>> {
        let mut table = self.state.write().await;
        let Some(ticket) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        // Resolve everything that can fail before the first write
        let owner_username = self.owner_username(ticket.owner_id).await?;

        if let Some(title) = &request.title {
            ticket.title = title.clone();
        }
        if let Some(description) = &request.description {
            ticket.description = description.clone();
        }
        if let Some(priority) = request.priority {
            ticket.priority = priority;
        }
        if let Some(status) = request.status {
            ticket.status = status;
        }

        Ok(Some(TicketDBResponse {
            ticket_id: id,
            owner_id: ticket.owner_id,
            owner_username,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            priority: ticket.priority,
            status: ticket.status,
            created_at: ticket.created_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;

    async fn setup() -> (Arc<MemoryUsers>, MemoryTickets, UserId) {
        let users = Arc::new(MemoryUsers::new());
        let owner = users
            .create(&UserCreateDBRequest {
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Client,
            })
            .await
            .unwrap();
        let tickets = MemoryTickets::new(users.clone());
        (users, tickets, owner.id)
    }

    fn create_request(owner_id: UserId, title: &str) -> TicketCreateDBRequest {
        TicketCreateDBRequest {
            owner_id,
            title: title.to_string(),
            description: "desc".to_string(),
            priority: Priority::Low,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let users = MemoryUsers::new();
        let request = UserCreateDBRequest {
            username: "bob".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Client,
        };
        users.create(&request).await.unwrap();
        let err = users.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Lookup is case-sensitive
        assert!(users.get_by_username("Bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_registration_has_single_winner() {
        let users = Arc::new(MemoryUsers::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let users = users.clone();
                tokio::spawn(async move {
                    users
                        .create(&UserCreateDBRequest {
                            username: "racer".to_string(),
                            password_hash: "hash".to_string(),
                            role: Role::Client,
                        })
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_user_update() {
        let (users, _, owner) = setup().await;
        let updated = users
            .update(
                owner,
                &UserUpdateDBRequest {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, "hash");
        assert!(users.update(Uuid::new_v4(), &UserUpdateDBRequest::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ticket_ids_are_monotonic_and_never_reused() {
        let (_, tickets, owner) = setup().await;
        let first = tickets.create(&create_request(owner, "one")).await.unwrap();
        let second = tickets.create(&create_request(owner, "two")).await.unwrap();
        assert_eq!(first.ticket_id, 1);
        assert_eq!(second.ticket_id, 2);
        assert_eq!(first.status, Status::Open);
        assert_eq!(first.owner_username, "alice");

        assert!(tickets.delete(second.ticket_id).await.unwrap());
        assert!(!tickets.delete(second.ticket_id).await.unwrap());
        let third = tickets.create(&create_request(owner, "three")).await.unwrap();
        assert_eq!(third.ticket_id, 3);
    }

    #[tokio::test]
    async fn test_list_filter_and_order() {
        let (users, tickets, alice) = setup().await;
        let bob = users
            .create(&UserCreateDBRequest {
                username: "bob".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Client,
            })
            .await
            .unwrap()
            .id;

        tickets.create(&create_request(alice, "a1")).await.unwrap();
        tickets.create(&create_request(bob, "b1")).await.unwrap();
        tickets.create(&create_request(alice, "a2")).await.unwrap();

        let mine: Vec<_> = tickets.list(&TicketFilter::owned_by(alice)).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(mine, vec!["a1", "a2"]);

        let all: Vec<_> = tickets.list(&TicketFilter::all()).await.unwrap().into_iter().map(|t| t.ticket_id).collect();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (_, tickets, owner) = setup().await;
        let ticket = tickets.create(&create_request(owner, "one")).await.unwrap();

        let updated = tickets
            .update(
                ticket.ticket_id,
                &TicketUpdateDBRequest {
                    priority: Some(Priority::High),
                    status: Some(Status::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "one");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, Status::Resolved);
        assert_eq!(updated.created_at, ticket.created_at);

        assert!(tickets.update(99, &TicketUpdateDBRequest::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_for_unknown_owner() {
        let (_, tickets, _) = setup().await;
        let err = tickets.create(&create_request(Uuid::new_v4(), "orphan")).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_row_untouched() {
        // A ticket whose owner is missing from the user store it is resolved against
        let tickets = MemoryTickets::new(Arc::new(MemoryUsers::new()));
        tickets.state.write().await.rows.insert(
            1,
            StoredTicket {
                owner_id: Uuid::new_v4(),
                title: "before".to_string(),
                description: "d".to_string(),
                priority: Priority::Low,
                status: Status::Open,
                created_at: Utc::now(),
            },
        );

        let err = tickets
            .update(
                1,
                &TicketUpdateDBRequest {
                    title: Some("after".to_string()),
                    status: Some(Status::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let table = tickets.state.read().await;
        let row = &table.rows[&1];
        assert_eq!(row.title, "before");
        assert_eq!(row.status, Status::Open);
    }
}
