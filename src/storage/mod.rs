pub mod repository;
pub mod sqlite;

pub use repository::CafeRepository;
pub use sqlite::SqliteCafeRepository;
