pub mod catalog_service;
pub mod crud;
pub mod error;
pub mod query_controller;
pub mod session;

pub use catalog_service::{CatalogService, WriteKind};
pub use crud::{delete_prompt, ConfirmPrompt, CrudCoordinator, DeleteOutcome, Preconfirmed};
pub use error::CatalogError;
pub use query_controller::{Applied, CatalogView, QueryController, ReadOutcome, ReadTicket};
pub use session::{SessionConfig, Theme};
