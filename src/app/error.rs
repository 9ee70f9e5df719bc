use crate::domain::{ShipmentId, ValidationError};
use crate::storage::StoreError;

/// Outcome errors of catalog operations. None of them is fatal to the catalog itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Bad user input; no store call was made.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// The store failed; the message is the store's, verbatim.
    #[error("{0}")]
    Store(String),
    /// The target row of an update or delete no longer exists.
    #[error("shipment {id} not found")]
    NotFound { id: ShipmentId },
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CatalogError::NotFound { id },
            other => CatalogError::Store(other.to_string()),
        }
    }
}
