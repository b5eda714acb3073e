pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::CafeService;
pub use domain::error::{CafeError, ValidationErrors};
pub use domain::model::{CafeRecord, NewCafe};
pub use infra::config::AppConfig;
pub use storage::{CafeRepository, SqliteCafeRepository};
