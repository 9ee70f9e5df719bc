//! The shipment catalog session.
//!
//! Composes the listing controller with the write coordinator and decides when the list is
//! re-read: after every user trigger and after every successful write.

use crate::app::crud::{ConfirmPrompt, CrudCoordinator, DeleteOutcome};
use crate::app::error::CatalogError;
use crate::app::query_controller::{CatalogView, QueryController};
use crate::app::session::SessionConfig;
use crate::domain::{
    DraftTarget, FilterChange, ShipmentDraft, ShipmentId, ShipmentInput, ValidationError,
};
use crate::storage::ShipmentStore;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Created,
    Updated,
    Deleted,
}

impl WriteKind {
    /// User-facing confirmation for a successful write.
    pub fn notice(self) -> &'static str {
        match self {
            WriteKind::Created => "Shipment created successfully!",
            WriteKind::Updated => "Shipment updated successfully!",
            WriteKind::Deleted => "Shipment deleted successfully!",
        }
    }
}

pub struct CatalogService {
    controller: QueryController,
    crud: CrudCoordinator,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn ShipmentStore>,
        session: SessionConfig,
        page_size: u64,
    ) -> Result<Self, ValidationError> {
        tracing::debug!(backend = store.backend(), page_size, ?session, "opening catalog");
        Ok(Self {
            controller: QueryController::new(Arc::clone(&store), session, page_size)?,
            crud: CrudCoordinator::new(store),
        })
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut QueryController {
        &mut self.controller
    }

    pub fn view(&self) -> CatalogView {
        self.controller.view()
    }

    // --- Listing triggers ---

    pub async fn refresh(&mut self) -> Result<(), CatalogError> {
        self.controller.refresh().await
    }

    pub async fn set_filter(&mut self, change: FilterChange) -> Result<(), CatalogError> {
        let ticket = self.controller.set_filter(change);
        self.controller.settle(ticket).await
    }

    // --- Writes ---

    pub async fn create(&mut self, input: &ShipmentInput) -> Result<ShipmentId, CatalogError> {
        let id = self.crud.create(input).await?;
        self.refresh_after(WriteKind::Created).await;
        Ok(id)
    }

    pub async fn update(
        &mut self,
        id: ShipmentId,
        input: &ShipmentInput,
    ) -> Result<(), CatalogError> {
        self.crud.update(id, input).await?;
        self.refresh_after(WriteKind::Updated).await;
        Ok(())
    }

    /// Submits an edit form. The cost is derived again from the draft's current inputs.
    pub async fn submit(&mut self, draft: &ShipmentDraft) -> Result<ShipmentId, CatalogError> {
        let (target, row) = draft.submit()?;
        match target {
            DraftTarget::Create => {
                let id = self.crud.insert(&row).await?;
                self.refresh_after(WriteKind::Created).await;
                Ok(id)
            }
            DraftTarget::Update(id) => {
                self.crud.replace(id, &row).await?;
                self.refresh_after(WriteKind::Updated).await;
                Ok(id)
            }
        }
    }

    /// Deletes after confirmation. A declined prompt makes no store call and leaves the list as is.
    pub async fn delete<P>(
        &mut self,
        id: ShipmentId,
        prompt: &P,
    ) -> Result<DeleteOutcome, CatalogError>
    where
        P: ConfirmPrompt + ?Sized,
    {
        let outcome = self.crud.delete(id, prompt).await?;
        if outcome == DeleteOutcome::Deleted {
            self.refresh_after(WriteKind::Deleted).await;
        }
        Ok(outcome)
    }

    // The write already succeeded; a failed re-read is kept as the controller's last error.
    async fn refresh_after(&mut self, kind: WriteKind) {
        if let Err(err) = self.controller.refresh().await {
            tracing::warn!(?kind, error = %err, "refresh after write failed");
        }
    }
}
