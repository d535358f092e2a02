//! Role and ownership based access rules for tickets.
//!
//! | Operation | client (owner) | client (non-owner) | admin |
//! |-----------|----------------|--------------------|-------|
//! | Create    | allowed        | n/a                | allowed |
//! | Read      | allowed        | denied             | allowed |
//! | List      | own only       | n/a                | all |
//! | Update    | allowed        | denied             | allowed |
//! | Delete    | denied         | denied             | allowed |

use crate::{
    api::models::users::{CurrentUser, Role},
    db::handlers::TicketFilter,
    errors::{Error, Result},
    types::{Operation, UserId},
};

/// The caller's relationship to the ticket being operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    NonOwner,
    /// Operations that do not target an existing ticket (create, list)
    NotApplicable,
}

impl Ownership {
    pub fn of(user: &CurrentUser, owner_id: UserId) -> Self {
        if user.id == owner_id {
            Ownership::Owner
        } else {
            Ownership::NonOwner
        }
    }
}

/// The rule table
pub fn is_allowed(role: Role, operation: Operation, ownership: Ownership) -> bool {
    match (role, operation) {
        (Role::Admin, _) => true,
        (Role::Client, Operation::Create | Operation::List) => true,
        (Role::Client, Operation::Read | Operation::Update) => ownership == Ownership::Owner,
        (Role::Client, Operation::Delete) => false,
    }
}

/// [`is_allowed`], as an error naming the denied action
pub fn require(user: &CurrentUser, operation: Operation, ownership: Ownership, resource: impl Into<String>) -> Result<()> {
    if is_allowed(user.role, operation, ownership) {
        Ok(())
    } else {
        Err(Error::InsufficientPermissions {
            action: operation,
            resource: resource.into(),
        })
    }
}

/// The store filter that limits a listing to what `user` may see
pub fn list_filter(user: &CurrentUser) -> TicketFilter {
    if user.is_admin() {
        TicketFilter::all()
    } else {
        TicketFilter::owned_by(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_may_do_everything() {
        for op in [Operation::Create, Operation::Read, Operation::List, Operation::Update, Operation::Delete] {
            for ownership in [Ownership::Owner, Ownership::NonOwner, Ownership::NotApplicable] {
                assert!(is_allowed(Role::Admin, op, ownership), "admin denied {op} as {ownership:?}");
            }
        }
    }

    #[test]
    fn test_client_rules() {
        assert!(is_allowed(Role::Client, Operation::Create, Ownership::NotApplicable));
        assert!(is_allowed(Role::Client, Operation::List, Ownership::NotApplicable));

        assert!(is_allowed(Role::Client, Operation::Read, Ownership::Owner));
        assert!(!is_allowed(Role::Client, Operation::Read, Ownership::NonOwner));

        assert!(is_allowed(Role::Client, Operation::Update, Ownership::Owner));
        assert!(!is_allowed(Role::Client, Operation::Update, Ownership::NonOwner));

        // Even owners cannot delete
        assert!(!is_allowed(Role::Client, Operation::Delete, Ownership::Owner));
        assert!(!is_allowed(Role::Client, Operation::Delete, Ownership::NonOwner));
    }

    #[test]
    fn test_ownership_of() {
        let alice = user(Role::Client);
        assert_eq!(Ownership::of(&alice, alice.id), Ownership::Owner);
        assert_eq!(Ownership::of(&alice, Uuid::new_v4()), Ownership::NonOwner);
    }

    #[test]
    fn test_require_produces_forbidden() {
        let client = user(Role::Client);
        let err = require(&client, Operation::Delete, Ownership::Owner, "ticket 7").unwrap_err();
        assert_eq!(err.user_message(), "Insufficient permissions to delete ticket 7");
        assert!(require(&client, Operation::Read, Ownership::Owner, "ticket 7").is_ok());
    }

    #[test]
    fn test_list_filter() {
        let client = user(Role::Client);
        assert_eq!(list_filter(&client).owner_id, Some(client.id));
        assert_eq!(list_filter(&user(Role::Admin)).owner_id, None);
    }
}
