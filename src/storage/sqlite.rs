//! `SQLite` implementation of `CafeRepository`.

use crate::domain::error::CafeError;
use crate::domain::model::{CafeRecord, NewCafe};
use crate::storage::repository::CafeRepository;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Column layout of the existing `cafes.db` files; those are reused as-is.
const CREATE_CAFE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS cafe (
    id INTEGER NOT NULL PRIMARY KEY,
    name VARCHAR(250) NOT NULL UNIQUE,
    map_url VARCHAR(500) NOT NULL,
    img_url VARCHAR(500) NOT NULL,
    location VARCHAR(250) NOT NULL,
    seats VARCHAR(250) NOT NULL,
    has_toilet BOOLEAN NOT NULL,
    has_wifi BOOLEAN NOT NULL,
    has_sockets BOOLEAN NOT NULL,
    can_take_calls BOOLEAN NOT NULL,
    coffee_price VARCHAR(250)
)";

const SELECT_COLUMNS: &str = "id, name, map_url, img_url, location, seats, \
    has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price";

#[derive(Clone)]
pub struct SqliteCafeRepository {
    pool: SqlitePool,
}

impl SqliteCafeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `database_url` and ensures the schema.
    ///
    /// An in-memory database lives and dies with its connection, so it is pinned
    /// to a single connection that is never recycled.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        } else {
            pool_options = pool_options.max_connections(max_connections.max(1));
        }

        let pool = pool_options.connect_with(options).await?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        info!(database_url, in_memory, "cafe database ready");
        Ok(repo)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), CafeError> {
        sqlx::query(CREATE_CAFE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, CafeError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cafe")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn cafe_from_row(row: &SqliteRow) -> Result<CafeRecord, sqlx::Error> {
    Ok(CafeRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        map_url: row.try_get("map_url")?,
        img_url: row.try_get("img_url")?,
        location: row.try_get("location")?,
        seats: row.try_get("seats")?,
        has_toilet: row.try_get("has_toilet")?,
        has_wifi: row.try_get("has_wifi")?,
        has_sockets: row.try_get("has_sockets")?,
        can_take_calls: row.try_get("can_take_calls")?,
        coffee_price: row.try_get("coffee_price")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl CafeRepository for SqliteCafeRepository {
    async fn insert(&self, cafe: NewCafe) -> Result<CafeRecord, CafeError> {
        let result = sqlx::query(
            "INSERT INTO cafe (name, map_url, img_url, location, seats, \
             has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(&cafe.coffee_price)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(cafe.into_record(done.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(CafeError::Conflict { name: cafe.name }),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<CafeRecord>, CafeError> {
        let sql = format!("SELECT {} FROM cafe ORDER BY id", SELECT_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "scanned cafe table");
        let cafes = rows
            .iter()
            .map(cafe_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cafes)
    }

    async fn find_by_location(&self, location: &str) -> Result<Option<CafeRecord>, CafeError> {
        // SQLite `=` on TEXT is binary: case-sensitive, no trimming.
        let sql = format!(
            "SELECT {} FROM cafe WHERE location = ? ORDER BY id LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(location)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(cafe_from_row).transpose()?)
    }

    async fn get(&self, id: i64) -> Result<Option<CafeRecord>, CafeError> {
        let sql = format!("SELECT {} FROM cafe WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(cafe_from_row).transpose()?)
    }

    async fn update_price(&self, id: i64, price: &str) -> Result<CafeRecord, CafeError> {
        let done = sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
            .bind(price)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(CafeError::NotFound(id));
        }
        self.get(id).await?.ok_or(CafeError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), CafeError> {
        let done = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(CafeError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CafeError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
