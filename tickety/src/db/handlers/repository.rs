//! Base repository trait for store operations.

/// Contains the Repository trait.
///
/// A repository is a data access layer for one entity. It provides methods for creating,
/// reading, updating, and deleting entities, as well as listing them with simple filters.
/// Implementations exist for Postgres and for an in-process store, and the rest of the
/// application only ever sees the trait.
use crate::db::errors::Result;

/// Base repository trait providing common store operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
/// Each method is a single atomic step: concurrent callers never observe a half-applied write.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// The request type for creating entities
    type CreateRequest: Send + Sync;

    /// The request type for updating entities
    type UpdateRequest: Send + Sync;

    /// The response/DTO type returned by operations
    type Response: Send + Sync;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching the filter, in ascending id order
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID, returning whether it existed
    async fn delete(&self, id: Self::Id) -> Result<bool>;

    /// Update an entity by ID, returning `None` if it does not exist
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Option<Self::Response>>;
}
