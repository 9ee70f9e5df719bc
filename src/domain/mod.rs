//! Shipment domain: records, cost derivation, edit drafts and listing state.

pub mod cost;
pub mod draft;
pub mod query;
pub mod shipment;

pub use cost::{compute_cost, cost_breakdown, round2, CostBreakdown};
pub use draft::{DraftTarget, ShipmentDraft};
pub use query::{
    FilterChange, ListFilter, ListRequest, PageSummary, QueryState, ResultPage, SortColumn,
    SortDirection, SortSpec,
};
pub use shipment::{
    ShipmentId, ShipmentInput, ShipmentRecord, ShipmentStatus, ShipmentWrite, StatusOption,
    ValidationError,
};
