use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::{
    domain::{MediaId, MediaKind, MediaRecord},
    error::MediaStoreError,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
use tracing::{debug, info};

pub const MEDIA_ORDER_INDEX: &str = "idx_media_sort_order";

/// Durable key-value store of media records, keyed by [`MediaId`].
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Inserts the record, replacing any existing record with the same id.
    async fn put(&self, record: &MediaRecord) -> Result<()>;
    /// Removes the record if present. Deleting an unknown id is not an error.
    async fn delete(&self, id: &MediaId) -> Result<()>;
    /// All records, ascending by insertion order.
    async fn get_all(&self) -> Result<Vec<MediaRecord>>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    /// Opens the database, creating the file and schema when absent.
    pub async fn initialize(database_url: &str) -> Result<Self, MediaStoreError> {
        Self::connect(database_url)
            .await
            .map_err(MediaStoreError::unavailable)
    }

    async fn connect(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);

        // Every connection to an in-memory database is its own database.
        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open media database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply media schema migrations")?;

        info!(database_url, "media store ready");
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    pub async fn has_order_index(&self) -> Result<bool> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'index' AND name = ?")
            .bind(MEDIA_ORDER_INDEX)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl MediaStore for Storage {
    async fn put(&self, record: &MediaRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO media (id, name, kind, blob, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                kind = excluded.kind,
                blob = excluded.blob,
                sort_order = excluded.sort_order
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.name)
        .bind(record.kind.as_str())
        .bind(&*record.blob)
        .bind(record.order)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to store media '{}'", record.id))?;
        debug!(id = %record.id, bytes = record.blob.len(), "stored media record");
        Ok(())
    }

    async fn delete(&self, id: &MediaId) -> Result<()> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete media '{id}'"))?;
        debug!(id = %id, removed = result.rows_affected(), "deleted media record");
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<MediaRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, kind, blob, sort_order
             FROM media
             ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to load media records")?;

        rows.iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<MediaRecord> {
    let id: String = row.try_get("id")?;
    let raw_kind: String = row.try_get("kind")?;
    let kind = MediaKind::parse(&raw_kind)
        .ok_or_else(|| anyhow!("media '{id}' has unknown kind '{raw_kind}'"))?;
    let blob: Vec<u8> = row.try_get("blob")?;
    Ok(MediaRecord {
        id: MediaId(id),
        name: row.try_get("name")?,
        kind,
        blob: Arc::from(blob),
        order: row.try_get("sort_order")?,
    })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
