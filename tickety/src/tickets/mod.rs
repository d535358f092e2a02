//! Ticket operations with access control and validation applied.
//!
//! Every operation on an existing ticket runs in the same order: resolve the ticket (absent is
//! `NotFound` for any caller), authorize against [`crate::auth::permissions`], validate the
//! payload, then make a single store call. A failure at any step leaves the store untouched.

pub mod validation;

use crate::{
    api::models::{tickets::TicketResponse, users::CurrentUser},
    auth::permissions::{self, Ownership},
    db::{
        handlers::{Repository, TicketRepository},
        models::tickets::{TicketCreateDBRequest, TicketDBResponse, TicketUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{Operation, TicketId},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

fn ticket_resource(id: TicketId) -> String {
    format!("ticket {id}")
}

#[derive(Clone)]
pub struct TicketManager {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketManager {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    async fn resolve(&self, id: TicketId) -> Result<TicketDBResponse> {
        self.tickets.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
            resource: "Ticket".to_string(),
            id: id.to_string(),
        })
    }

    /// Create a ticket owned by the caller
    #[instrument(skip_all, fields(user = %caller.username))]
    pub async fn create(&self, caller: &CurrentUser, payload: &Map<String, Value>) -> Result<TicketResponse> {
        permissions::require(caller, Operation::Create, Ownership::NotApplicable, "tickets")?;
        let create = validation::parse_create(payload)?;

        let ticket = self.tickets.create(&TicketCreateDBRequest::new(caller.id, create)).await?;
        info!("Created ticket {} for {}", ticket.ticket_id, caller.username);
        Ok(ticket.into())
    }

    #[instrument(skip_all, fields(user = %caller.username, ticket_id = id))]
    pub async fn get(&self, caller: &CurrentUser, id: TicketId) -> Result<TicketResponse> {
        let ticket = self.resolve(id).await?;
        permissions::require(caller, Operation::Read, Ownership::of(caller, ticket.owner_id), ticket_resource(id))?;
        Ok(ticket.into())
    }

    /// All tickets for admins, the caller's own tickets otherwise, in id order
    #[instrument(skip_all, fields(user = %caller.username))]
    pub async fn list(&self, caller: &CurrentUser) -> Result<Vec<TicketResponse>> {
        permissions::require(caller, Operation::List, Ownership::NotApplicable, "tickets")?;
        let tickets = self.tickets.list(&permissions::list_filter(caller)).await?;
        Ok(tickets.into_iter().map(Into::into).collect())
    }

    #[instrument(skip_all, fields(user = %caller.username, ticket_id = id))]
    pub async fn update(&self, caller: &CurrentUser, id: TicketId, payload: &Map<String, Value>) -> Result<TicketResponse> {
        let ticket = self.resolve(id).await?;
        permissions::require(caller, Operation::Update, Ownership::of(caller, ticket.owner_id), ticket_resource(id))?;
        let update = validation::parse_update(payload)?;

        if update.is_empty() {
            return Ok(ticket.into());
        }

        // Deleted between the lookup and the write
        let updated = self
            .tickets
            .update(id, &TicketUpdateDBRequest::from(update))
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "Ticket".to_string(),
                id: id.to_string(),
            })?;
        info!("Updated ticket {id}");
        Ok(updated.into())
    }

    #[instrument(skip_all, fields(user = %caller.username, ticket_id = id))]
    pub async fn delete(&self, caller: &CurrentUser, id: TicketId) -> Result<()> {
        let ticket = self.resolve(id).await?;
        permissions::require(caller, Operation::Delete, Ownership::of(caller, ticket.owner_id), ticket_resource(id))?;

        if !self.tickets.delete(id).await? {
            return Err(Error::NotFound {
                resource: "Ticket".to_string(),
                id: id.to_string(),
            });
        }
        info!("Deleted ticket {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::tickets::{Priority, Status};
    use crate::api::models::users::Role;
    use crate::test_utils::{create_test_state, create_test_user};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    async fn setup() -> (TicketManager, CurrentUser, CurrentUser, CurrentUser) {
        let state = create_test_state();
        let alice = create_test_user(&state, "alice", "pw", Role::Client).await;
        let bob = create_test_user(&state, "bob", "pw", Role::Client).await;
        let admin = create_test_user(&state, "root", "pw", Role::Admin).await;
        (
            TicketManager::new(state.tickets.clone()),
            alice.into(),
            bob.into(),
            admin.into(),
        )
    }

    fn new_ticket(title: &str) -> Map<String, Value> {
        object(json!({"title": title, "description": "d", "priority": "low"}))
    }

    #[tokio::test]
    async fn test_missing_ticket_is_not_found_before_forbidden() {
        let (manager, alice, _, _) = setup().await;
        assert!(matches!(manager.get(&alice, 404).await, Err(Error::NotFound { .. })));
        assert!(matches!(manager.delete(&alice, 404).await, Err(Error::NotFound { .. })));
        assert!(matches!(
            manager.update(&alice, 404, &object(json!({"priority": "urgent"}))).await,
            Err(Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_owner_is_forbidden() {
        let (manager, alice, bob, admin) = setup().await;
        let ticket = manager.create(&alice, &new_ticket("mine")).await.unwrap();
        assert_eq!(ticket.owner, "alice");
        assert_eq!(ticket.status, Status::Open);

        assert!(matches!(
            manager.get(&bob, ticket.ticket_id).await,
            Err(Error::InsufficientPermissions { .. })
        ));
        assert!(matches!(
            manager.update(&bob, ticket.ticket_id, &object(json!({"title": "x"}))).await,
            Err(Error::InsufficientPermissions { .. })
        ));
        assert!(manager.get(&admin, ticket.ticket_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_authorization_precedes_validation() {
        let (manager, alice, bob, _) = setup().await;
        let ticket = manager.create(&alice, &new_ticket("mine")).await.unwrap();

        // An invalid payload from a non-owner is still reported as forbidden
        assert!(matches!(
            manager.update(&bob, ticket.ticket_id, &object(json!({"priority": "urgent"}))).await,
            Err(Error::InsufficientPermissions { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_ticket_unchanged() {
        let (manager, alice, _, _) = setup().await;
        let ticket = manager.create(&alice, &new_ticket("mine")).await.unwrap();

        let result = manager
            .update(&alice, ticket.ticket_id, &object(json!({"title": "renamed", "status": "done"})))
            .await;
        assert!(matches!(result, Err(Error::BadRequest { .. })));

        let after = manager.get(&alice, ticket.ticket_id).await.unwrap();
        assert_eq!(after.title, "mine");
        assert_eq!(after.status, Status::Open);
    }

    #[tokio::test]
    async fn test_owner_update() {
        let (manager, alice, _, _) = setup().await;
        let ticket = manager.create(&alice, &new_ticket("mine")).await.unwrap();

        let updated = manager
            .update(&alice, ticket.ticket_id, &object(json!({"priority": "high", "status": "resolved"})))
            .await
            .unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, Status::Resolved);
        assert_eq!(updated.title, "mine");

        // An empty patch is a no-op
        let same = manager.update(&alice, ticket.ticket_id, &Map::new()).await.unwrap();
        assert_eq!(same.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_only_admin_deletes() {
        let (manager, alice, _, admin) = setup().await;
        let ticket = manager.create(&alice, &new_ticket("mine")).await.unwrap();

        assert!(matches!(
            manager.delete(&alice, ticket.ticket_id).await,
            Err(Error::InsufficientPermissions { .. })
        ));
        manager.delete(&admin, ticket.ticket_id).await.unwrap();
        assert!(matches!(
            manager.get(&admin, ticket.ticket_id).await,
            Err(Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_scoping() {
        let (manager, alice, bob, admin) = setup().await;
        manager.create(&alice, &new_ticket("a1")).await.unwrap();
        manager.create(&bob, &new_ticket("b1")).await.unwrap();
        manager.create(&admin, &new_ticket("r1")).await.unwrap();
        manager.create(&alice, &new_ticket("a2")).await.unwrap();

        let titles = |tickets: Vec<TicketResponse>| tickets.into_iter().map(|t| t.title).collect::<Vec<_>>();
        assert_eq!(titles(manager.list(&alice).await.unwrap()), vec!["a1", "a2"]);
        assert_eq!(titles(manager.list(&bob).await.unwrap()), vec!["b1"]);
        assert_eq!(titles(manager.list(&admin).await.unwrap()), vec!["a1", "b1", "r1", "a2"]);
    }
}
