//! Key/value draft storage behind one small async port.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::Result;

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`.
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Drafts in the `drafts` table.
#[derive(Clone)]
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftStore for SqliteDraftStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        db::load_draft(&self.pool, key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        db::save_draft(&self.pool, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        db::delete_draft(&self.pool, key).await?;
        Ok(())
    }
}
