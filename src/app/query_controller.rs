//! Listing controller: owns the filter/sort/page state and the page currently on display.
//!
//! Every trigger returns a [`ReadTicket`] carrying a fresh sequence number. Only the response
//! to the most recently issued ticket is ever applied; older responses are dropped when they
//! arrive, so a slow read can never overwrite the page of a newer one.

use crate::app::error::CatalogError;
use crate::app::session::{SessionConfig, Theme};
use crate::domain::{
    FilterChange, ListRequest, PageSummary, QueryState, ResultPage, ShipmentStatus, SortColumn,
    StatusOption, ValidationError,
};
use crate::storage::{ShipmentStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// A read that has been issued but not yet resolved.
#[must_use = "a ReadTicket does nothing until it is resolved and applied"]
pub struct ReadTicket {
    seq: u64,
    request: ListRequest,
    store: Arc<dyn ShipmentStore>,
}

impl ReadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &ListRequest {
        &self.request
    }

    /// Performs the store call. Borrows nothing from the controller, so several tickets can
    /// be in flight at once.
    pub async fn resolve(self) -> ReadOutcome {
        let result = self.store.list(&self.request).await;
        ReadOutcome {
            seq: self.seq,
            result,
        }
    }
}

pub struct ReadOutcome {
    seq: u64,
    result: Result<ResultPage, StoreError>,
}

/// What [`QueryController::apply`] did with an outcome.
#[must_use]
pub enum Applied {
    /// The latest read succeeded and its page is now displayed.
    Page,
    /// A newer read was issued after this one; the outcome was discarded.
    Stale,
    /// The latest read failed; the previous page is still displayed.
    Failed(CatalogError),
    /// The page index fell past the last page (rows were removed); it was pulled back and
    /// this follow-up read must be resolved.
    Reclamped(ReadTicket),
}

/// Everything a presentation layer needs to render the list.
///
/// `loading` is true while the latest issued read has not been applied yet.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogView {
    pub query: QueryState,
    pub page: ResultPage,
    pub summary: PageSummary,
    pub loading: bool,
    pub last_error: Option<String>,
    pub theme: Theme,
    /// Status filter choices with their display labels.
    pub statuses: Vec<StatusOption>,
}

pub struct QueryController {
    store: Arc<dyn ShipmentStore>,
    session: SessionConfig,
    query: QueryState,
    page: ResultPage,
    loading: bool,
    last_error: Option<CatalogError>,
    latest_seq: u64,
}

impl QueryController {
    pub fn new(
        store: Arc<dyn ShipmentStore>,
        session: SessionConfig,
        page_size: u64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            store,
            session,
            query: QueryState::with_page_size(page_size)?,
            page: ResultPage::default(),
            loading: false,
            last_error: None,
            latest_seq: 0,
        })
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> &ResultPage {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.session.theme = theme;
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary::of(&self.query, self.page.total_count)
    }

    pub fn view(&self) -> CatalogView {
        CatalogView {
            query: self.query.clone(),
            page: self.page.clone(),
            summary: self.summary(),
            loading: self.loading,
            last_error: self.last_error.as_ref().map(|e| e.to_string()),
            theme: self.session.theme,
            statuses: ShipmentStatus::options(),
        }
    }

    /// Issues a read for the current state, superseding any read still in flight.
    pub fn request_refresh(&mut self) -> ReadTicket {
        self.latest_seq += 1;
        self.loading = true;
        let request = self.query.to_request();
        tracing::debug!(
            seq = self.latest_seq,
            offset = request.offset,
            limit = request.limit,
            "issuing shipment read"
        );
        ReadTicket {
            seq: self.latest_seq,
            request,
            store: Arc::clone(&self.store),
        }
    }

    /// Merges search/status/sort changes and returns to the first page.
    pub fn set_filter(&mut self, change: FilterChange) -> ReadTicket {
        self.query.apply_filter(change);
        self.request_refresh()
    }

    pub fn toggle_sort(&mut self, column: SortColumn) -> ReadTicket {
        self.query.toggle_sort(column);
        self.request_refresh()
    }

    /// `None` when already on the last page.
    pub fn next_page(&mut self) -> Option<ReadTicket> {
        if !self.query.advance(self.page.total_count) {
            return None;
        }
        Some(self.request_refresh())
    }

    /// `None` when already on the first page.
    pub fn prev_page(&mut self) -> Option<ReadTicket> {
        if !self.query.retreat() {
            return None;
        }
        Some(self.request_refresh())
    }

    pub fn apply(&mut self, outcome: ReadOutcome) -> Applied {
        if outcome.seq != self.latest_seq {
            tracing::debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "discarding superseded shipment read"
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok(page) => {
                if self.query.clamp_to(page.total_count) && page.total_count > 0 {
                    tracing::info!(
                        total = page.total_count,
                        page_index = self.query.page_index(),
                        "page index past the end, re-reading last page"
                    );
                    return Applied::Reclamped(self.request_refresh());
                }
                tracing::debug!(
                    seq = outcome.seq,
                    rows = page.records.len(),
                    total = page.total_count,
                    "applied shipment page"
                );
                self.page = page;
                self.loading = false;
                self.last_error = None;
                Applied::Page
            }
            Err(err) => {
                let err = CatalogError::from(err);
                tracing::warn!(seq = outcome.seq, error = %err, "shipment read failed");
                self.loading = false;
                self.last_error = Some(err.clone());
                Applied::Failed(err)
            }
        }
    }

    /// Resolves `ticket` and applies it, following any re-clamp reads.
    pub async fn settle(&mut self, ticket: ReadTicket) -> Result<(), CatalogError> {
        let mut ticket = ticket;
        loop {
            let outcome = ticket.resolve().await;
            match self.apply(outcome) {
                Applied::Page | Applied::Stale => return Ok(()),
                Applied::Failed(err) => return Err(err),
                Applied::Reclamped(next) => ticket = next,
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), CatalogError> {
        let ticket = self.request_refresh();
        self.settle(ticket).await
    }
}
