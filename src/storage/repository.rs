//! Storage contract for café records.

use crate::domain::error::CafeError;
use crate::domain::model::{CafeRecord, NewCafe};
use async_trait::async_trait;

/// Durable mapping from id to `CafeRecord`.
///
/// Every method is a single statement; there are no multi-record transactions.
#[async_trait]
pub trait CafeRepository: Send + Sync {
    /// Stores a new café. Fails with `CafeError::Conflict` if the name is taken.
    async fn insert(&self, cafe: NewCafe) -> Result<CafeRecord, CafeError>;

    /// Full scan, ordered by id.
    async fn list_all(&self) -> Result<Vec<CafeRecord>, CafeError>;

    /// First café (by id) whose location equals `location` exactly.
    async fn find_by_location(&self, location: &str) -> Result<Option<CafeRecord>, CafeError>;

    async fn get(&self, id: i64) -> Result<Option<CafeRecord>, CafeError>;

    /// Replaces the coffee price and returns the updated record.
    async fn update_price(&self, id: i64, price: &str) -> Result<CafeRecord, CafeError>;

    async fn delete(&self, id: i64) -> Result<(), CafeError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), CafeError>;
}
