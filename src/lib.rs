pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogError, CatalogService, QueryController, SessionConfig, Theme};
pub use domain::{
    compute_cost, FilterChange, ShipmentDraft, ShipmentId, ShipmentInput, ShipmentRecord,
    ShipmentStatus, SortColumn, SortDirection,
};
pub use infra::config::CatalogConfig;
pub use storage::{MemoryStore, ShipmentStore, StoreError};
