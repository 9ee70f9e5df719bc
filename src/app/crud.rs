//! Create/update/delete against the store.
//!
//! Every write is validated and has its cost derived here before the store sees it. Each call
//! is its own round trip; nothing is batched or coalesced.

use crate::app::error::CatalogError;
use crate::domain::{ShipmentId, ShipmentInput, ShipmentWrite};
use crate::storage::ShipmentStore;
use std::sync::Arc;

/// Synchronous yes/no gate in front of destructive operations.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// A prompt whose answer is already known (e.g. a `confirm` flag in an HTTP body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preconfirmed(pub bool);

impl ConfirmPrompt for Preconfirmed {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no; the store was not called.
    Declined,
}

pub fn delete_prompt(id: ShipmentId) -> String {
    format!("Are you sure you want to delete shipment {}?", id)
}

#[derive(Clone)]
pub struct CrudCoordinator {
    store: Arc<dyn ShipmentStore>,
}

impl CrudCoordinator {
    pub fn new(store: Arc<dyn ShipmentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: &ShipmentInput) -> Result<ShipmentId, CatalogError> {
        let row = ShipmentWrite::from_input(input)?;
        self.insert(&row).await
    }

    /// Writes a row that was already derived (e.g. from a submitted draft).
    pub async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, CatalogError> {
        match self.store.insert(row).await {
            Ok(id) => {
                tracing::info!(%id, cost = row.shipping_cost(), "shipment created");
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "shipment insert failed");
                Err(err.into())
            }
        }
    }

    pub async fn update(&self, id: ShipmentId, input: &ShipmentInput) -> Result<(), CatalogError> {
        let row = ShipmentWrite::from_input(input)?;
        self.replace(id, &row).await
    }

    pub async fn replace(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), CatalogError> {
        match self.store.update(id, row).await {
            Ok(()) => {
                tracing::info!(%id, cost = row.shipping_cost(), "shipment updated");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "shipment update failed");
                Err(err.into())
            }
        }
    }

    pub async fn delete<P>(&self, id: ShipmentId, prompt: &P) -> Result<DeleteOutcome, CatalogError>
    where
        P: ConfirmPrompt + ?Sized,
    {
        if !prompt.confirm(&delete_prompt(id)) {
            tracing::debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }
        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "shipment deleted");
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                tracing::warn!(%id, error = %err, "shipment delete failed");
                Err(err.into())
            }
        }
    }
}
