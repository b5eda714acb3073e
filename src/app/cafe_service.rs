//! The café directory service.
//!
//! Sits between the HTTP handlers and the repository. It is responsible for:
//! 1.  Opening the database and ensuring the `cafe` table exists.
//! 2.  Turning empty scans and missing ids into explicit domain errors.
//! 3.  Gating deletion behind the shared deletion key.

use crate::crypto::csrf::constant_time_eq;
use crate::domain::error::CafeError;
use crate::domain::model::{CafeRecord, NewCafe};
use crate::infra::config::AppConfig;
use crate::storage::{CafeRepository, SqliteCafeRepository};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CafeService {
    repo: Arc<dyn CafeRepository>,
    delete_key: String,
}

impl CafeService {
    pub fn new(repo: Arc<dyn CafeRepository>, delete_key: impl Into<String>) -> Self {
        Self {
            repo,
            delete_key: delete_key.into(),
        }
    }

    /// Connects to the configured SQLite database.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let repo =
            SqliteCafeRepository::connect(&config.database_url, config.database_max_connections)
                .await?;
        Ok(Self::new(Arc::new(repo), config.delete_key.clone()))
    }

    pub async fn all(&self) -> Result<Vec<CafeRecord>, CafeError> {
        self.repo.list_all().await
    }

    /// One café chosen uniformly at random.
    pub async fn random(&self) -> Result<CafeRecord, CafeError> {
        let cafes = self.repo.list_all().await?;
        cafes
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(CafeError::EmptyCollection)
    }

    pub async fn find_by_location(&self, location: &str) -> Result<Option<CafeRecord>, CafeError> {
        self.repo.find_by_location(location).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<CafeRecord>, CafeError> {
        self.repo.get(id).await
    }

    pub async fn add(&self, cafe: NewCafe) -> Result<CafeRecord, CafeError> {
        let stored = self.repo.insert(cafe).await?;
        info!(id = stored.id, name = %stored.name, "cafe added");
        Ok(stored)
    }

    pub async fn update_price(&self, id: i64, price: &str) -> Result<CafeRecord, CafeError> {
        let updated = self.repo.update_price(id, price).await?;
        info!(id, price, "coffee price updated");
        Ok(updated)
    }

    /// Checks a submitted deletion key. Absent and empty keys never match.
    pub fn authorize_delete(&self, key: Option<&str>) -> Result<(), CafeError> {
        match key {
            Some(k) if !k.is_empty() && constant_time_eq(k.as_bytes(), self.delete_key.as_bytes()) => {
                Ok(())
            }
            _ => {
                warn!("report-closed rejected: deletion key mismatch");
                Err(CafeError::Authorization)
            }
        }
    }

    /// Deletes a café after checking the deletion key.
    pub async fn report_closed(&self, id: i64, key: Option<&str>) -> Result<(), CafeError> {
        self.authorize_delete(key)?;
        self.repo.delete(id).await?;
        info!(id, "cafe reported closed and removed");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), CafeError> {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_service() -> CafeService {
        let repo = SqliteCafeRepository::connect("sqlite::memory:", 1)
            .await
            .unwrap();
        CafeService::new(Arc::new(repo), "TopSecretAPIKey")
    }

    fn new_cafe(name: &str) -> NewCafe {
        NewCafe {
            name: name.to_string(),
            map_url: "https://maps.example/x".to_string(),
            img_url: "https://img.example/x.jpg".to_string(),
            location: "Hackney".to_string(),
            seats: "0-10".to_string(),
            has_toilet: false,
            has_wifi: true,
            has_sockets: true,
            can_take_calls: false,
            coffee_price: Some("£2.20".to_string()),
        }
    }

    #[tokio::test]
    async fn test_random_on_empty_table() {
        let service = memory_service().await;
        assert!(matches!(
            service.random().await,
            Err(CafeError::EmptyCollection)
        ));
    }

    #[tokio::test]
    async fn test_random_with_single_record_returns_it() {
        let service = memory_service().await;
        let only = service.add(new_cafe("Only One")).await.unwrap();
        for _ in 0..10 {
            assert_eq!(service.random().await.unwrap(), only);
        }
    }

    #[tokio::test]
    async fn test_random_draws_from_all_records() {
        let service = memory_service().await;
        let a = service.add(new_cafe("A")).await.unwrap();
        let b = service.add(new_cafe("B")).await.unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = service.random().await.unwrap();
            assert!(picked == a || picked == b);
            seen.insert(picked.id);
        }
        assert!(seen.contains(&a.id), "first cafe never picked");
        assert!(seen.contains(&b.id), "second cafe never picked");
    }

    #[tokio::test]
    async fn test_wrong_key_keeps_record() {
        let service = memory_service().await;
        let cafe = service.add(new_cafe("Keep Me")).await.unwrap();

        for key in [None, Some(""), Some("topsecretapikey"), Some("TopSecretAPIKey ")] {
            assert!(matches!(
                service.report_closed(cafe.id, key).await,
                Err(CafeError::Authorization)
            ));
        }
        assert_eq!(service.all().await.unwrap(), vec![cafe]);
    }

    #[tokio::test]
    async fn test_right_key_deletes_target_only() {
        let service = memory_service().await;
        let gone = service.add(new_cafe("Gone")).await.unwrap();
        let stays = service.add(new_cafe("Stays")).await.unwrap();

        service
            .report_closed(gone.id, Some("TopSecretAPIKey"))
            .await
            .unwrap();

        assert_eq!(service.all().await.unwrap(), vec![stays]);
        assert!(matches!(
            service.report_closed(gone.id, Some("TopSecretAPIKey")).await,
            Err(CafeError::NotFound(_))
        ));
    }
}
