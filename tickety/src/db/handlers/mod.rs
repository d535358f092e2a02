//! Repository implementations for the Postgres backend.
//!
//! Each repository wraps a connection pool, binds parameters, and returns records from
//! [`crate::db::models`]. The in-process equivalents live in [`crate::db::memory`].
//!
//! # Available Repositories
//!
//! - [`Users`]: The credential store, keyed by id and unique username
//! - [`TicketRepository`]: Ticket CRUD, implemented by [`PgTickets`]
//!
//! # Common Pattern
//!
//! ```ignore
//! use tickety::db::handlers::{PgTickets, Repository, TicketFilter};
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let tickets = PgTickets::new(pool);
//!     for ticket in tickets.list(&TicketFilter::all()).await? {
//!         println!("#{} {}", ticket.ticket_id, ticket.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod repository;
pub mod tickets;
pub mod users;

pub use repository::Repository;
pub use tickets::{PgTickets, TicketFilter, TicketRepository};
pub use users::{PgUsers, Users};
