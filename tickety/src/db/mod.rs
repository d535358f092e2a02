//! Store layer for users and tickets.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  Tickets    │  (tickets::TicketManager - access control & validation)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers traits)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┬─────────────┐
//! │  PostgreSQL │  In-memory  │
//! └─────────────┴─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository traits and their Postgres implementations
//! - [`memory`]: In-process implementations used without a database and in tests
//! - [`models`]: Store record structures
//! - [`errors`]: Store error types
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! tickety::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
