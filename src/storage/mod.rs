//! Remote shipment stores.
//!
//! The store is an opaque collaborator: it filters, sorts, paginates and counts, and applies
//! single-row writes. It does not derive costs or validate user input.

use crate::domain::{ListRequest, ResultPage, ShipmentId, ShipmentWrite};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryStore;
pub use postgres::PostgresShipmentStore;
pub use rest::RestShipmentStore;

/// Errors a store reports. Messages are surfaced to users verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// No row matched the id of an update or delete.
    #[error("shipment {0} not found")]
    NotFound(ShipmentId),
    /// The store refused the request (constraint violation, malformed filter, auth).
    #[error("{0}")]
    Rejected(String),
    /// The store could not be reached.
    #[error("{0}")]
    Transport(String),
    /// The store answered with something that could not be decoded.
    #[error("unexpected store response: {0}")]
    Decode(String),
}

/// Contract every backend implements.
///
/// Each call resolves exactly once. Implementations must be `Send + Sync` so a single store
/// can be shared (`Arc<dyn ShipmentStore>`) between the controller and axum state.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Returns one page of the filtered, ordered set together with the exact size of that set.
    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError>;

    /// Inserts a row; the store assigns `id` and `created_at`.
    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError>;

    /// Replaces the editable columns of `id`. Fails with [`StoreError::NotFound`] if no row matched.
    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError>;

    /// Deletes `id`. Fails with [`StoreError::NotFound`] if no row matched.
    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError>;
}
