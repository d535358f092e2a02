//! Ticket store: Postgres implementation of the ticket repository.

use crate::{
    api::models::tickets::{Priority, Status},
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::tickets::{TicketCreateDBRequest, TicketDBResponse, TicketUpdateDBRequest},
    },
    types::{abbrev_uuid, TicketId, UserId},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

/// Filter for listing tickets
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Restrict to tickets owned by this user; `None` lists everything
    pub owner_id: Option<UserId>,
}

impl TicketFilter {
    pub fn owned_by(owner_id: UserId) -> Self {
        Self { owner_id: Some(owner_id) }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// The ticket repository the rest of the application depends on
pub trait TicketRepository:
    Repository<
        CreateRequest = TicketCreateDBRequest,
        UpdateRequest = TicketUpdateDBRequest,
        Response = TicketDBResponse,
        Id = TicketId,
        Filter = TicketFilter,
    >
{
}

impl<T> TicketRepository for T where
    T: Repository<
            CreateRequest = TicketCreateDBRequest,
            UpdateRequest = TicketUpdateDBRequest,
            Response = TicketDBResponse,
            Id = TicketId,
            Filter = TicketFilter,
        >
{
}

// Database entity model, joined with the owner's username
#[derive(Debug, Clone, FromRow)]
struct Ticket {
    pub ticket_id: TicketId,
    pub owner_id: UserId,
    pub owner_username: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketDBResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id,
            owner_id: ticket.owner_id,
            owner_username: ticket.owner_username,
            title: ticket.title,
            description: ticket.description,
            priority: ticket.priority,
            status: ticket.status,
            created_at: ticket.created_at,
        }
    }
}

/// Postgres-backed ticket repository
#[derive(Debug, Clone)]
pub struct PgTickets {
    pool: PgPool,
}

impl PgTickets {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PgTickets {
    type CreateRequest = TicketCreateDBRequest;
    type UpdateRequest = TicketUpdateDBRequest;
    type Response = TicketDBResponse;
    type Id = TicketId;
    type Filter = TicketFilter;

    #[instrument(skip(self, request), fields(owner_id = %abbrev_uuid(&request.owner_id)), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            WITH inserted AS (
                INSERT INTO tickets (owner_id, title, description, priority)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT i.ticket_id, i.owner_id, u.username AS owner_username, i.title, i.description,
                   i.priority, i.status, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.owner_id
            "#,
        )
        .bind(request.owner_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.priority)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT t.ticket_id, t.owner_id, u.username AS owner_username, t.title, t.description,
                   t.priority, t.status, t.created_at
            FROM tickets t
            JOIN users u ON u.id = t.owner_id
            WHERE t.ticket_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket.map(Into::into))
    }

    #[instrument(skip(self, filter), fields(owner_id = ?filter.owner_id.as_ref().map(abbrev_uuid)), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT t.ticket_id, t.owner_id, u.username AS owner_username, t.title, t.description,
                   t.priority, t.status, t.created_at
            FROM tickets t
            JOIN users u ON u.id = t.owner_id
            WHERE ($1::uuid IS NULL OR t.owner_id = $1)
            ORDER BY t.ticket_id
            "#,
        )
        .bind(filter.owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tickets WHERE ticket_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>> {
        // Single statement: either every supplied field is written or none is
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            WITH updated AS (
                UPDATE tickets SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    priority = COALESCE($4, priority),
                    status = COALESCE($5, status)
                WHERE ticket_id = $1
                RETURNING *
            )
            SELECT t.ticket_id, t.owner_id, u.username AS owner_username, t.title, t.description,
                   t.priority, t.status, t.created_at
            FROM updated t
            JOIN users u ON u.id = t.owner_id
            "#,
        )
        .bind(id)
        .bind(request.title.as_deref())
        .bind(request.description.as_deref())
        .bind(request.priority)
        .bind(request.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket.map(Into::into))
    }
}
