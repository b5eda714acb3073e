pub mod error;
pub mod router;
pub mod types;
pub mod views;
pub mod handlers {
    pub mod add;
    pub mod common;
    pub mod find;
    pub mod health;
    pub mod pages;
    pub mod report_closed;
    pub mod update_price;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
