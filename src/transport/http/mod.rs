pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod cost;
    pub mod health;
    pub mod session;
    pub mod shipments;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
