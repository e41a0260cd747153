use std::env;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, QueryOrder, Schema, Set, TransactionTrait,
};
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

use crate::error_handling::types::StoreError;
use crate::feed::{FeedItem, FeedSnapshot};
use crate::storage::db_entities::{self as cache, feed_items, image_blobs};
use crate::storage::storage_trait::Storage;

/// SQLite-backed store using SeaORM.
///
/// The snapshot lives in the `cache` and `feed_items` tables and is replaced
/// inside a single transaction, so a failed insert rolls back to the previous
/// state. Image payloads live in `image_blobs`, upserted per URL.
pub struct DatabaseStorage {
    conn: DatabaseConnection,
    // Same discipline as FileStorage: mutations exclusive, reads shared.
    gate: RwLock<()>,
}

fn item_from_row(row: feed_items::Model) -> Result<FeedItem, StoreError> {
    let id = Uuid::parse_str(&row.item_id).map_err(|e| { error!("Invalid item UUID in feed_items row {}: {}", row.id, e); StoreError::DecodeFailed })?;
    let url = Url::parse(&row.url).map_err(|e| { error!("Invalid item URL in feed_items row {}: {}", row.id, e); StoreError::DecodeFailed })?;
    Ok(FeedItem {
        id,
        description: row.description,
        location: row.location,
        url,
    })
}

fn timestamp_from_row(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| { error!("Invalid cache timestamp {:?}: {}", raw, e); StoreError::DecodeFailed })
}

impl DatabaseStorage {
    /// Default database filename used in the application's working directory
    pub const DEFAULT_DB_FILE: &'static str = "feedcache.sqlite3";

    /// Create or open the database in the current working directory with the default filename
    pub async fn new() -> Result<Self, StoreError> {
        let cwd = env::current_dir().map_err(|e| { error!("Failed to get current dir: {}", e); StoreError::ConnectionFailed })?;
        Self::new_file(cwd.join(Self::DEFAULT_DB_FILE)).await
    }

    pub async fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| { error!("Failed to create db dir {}: {}", parent.display(), e); StoreError::WriteFailed })?;
        }

        let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
        opts.max_connections(5);
        let conn = Database::connect(opts).await.map_err(|e| { error!("Failed to open database {}: {}", path.display(), e); StoreError::ConnectionFailed })?;

        Self::create_schema(&conn).await?;
        info!("DatabaseStorage initialized at {}", path.display());

        Ok(Self {
            conn,
            gate: RwLock::new(()),
        })
    }

    async fn create_schema(conn: &DatabaseConnection) -> Result<(), StoreError> {
        let backend = conn.get_database_backend();
        let schema = Schema::new(backend);
        for mut stmt in [
            schema.create_table_from_entity(cache::Entity),
            schema.create_table_from_entity(feed_items::Entity),
            schema.create_table_from_entity(image_blobs::Entity),
        ] {
            conn.execute(backend.build(stmt.if_not_exists()))
                .await
                .map_err(|e| { error!("Failed to create schema: {}", e); StoreError::WriteFailed })?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for DatabaseStorage {
    async fn delete_cached_feed(&self) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        let txn = self.conn.begin().await.map_err(|e| { error!("Failed to begin transaction: {}", e); StoreError::WriteFailed })?;
        feed_items::Entity::delete_many().exec(&txn).await.map_err(|e| { error!("Failed to delete feed items: {}", e); StoreError::WriteFailed })?;
        cache::Entity::delete_many().exec(&txn).await.map_err(|e| { error!("Failed to delete cache row: {}", e); StoreError::WriteFailed })?;
        txn.commit().await.map_err(|e| { error!("Failed to commit delete: {}", e); StoreError::WriteFailed })?;
        debug!("Deleted cached feed");
        Ok(())
    }

    async fn insert(&self, items: &[FeedItem], timestamp: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        let txn = self.conn.begin().await.map_err(|e| { error!("Failed to begin transaction: {}", e); StoreError::WriteFailed })?;

        feed_items::Entity::delete_many().exec(&txn).await.map_err(|e| { error!("Failed to clear feed items: {}", e); StoreError::WriteFailed })?;
        cache::Entity::delete_many().exec(&txn).await.map_err(|e| { error!("Failed to clear cache row: {}", e); StoreError::WriteFailed })?;

        let inserted = cache::Entity::insert(cache::ActiveModel {
            id: NotSet,
            timestamp: Set(timestamp.to_rfc3339()),
        })
        .exec(&txn)
        .await
        .map_err(|e| { error!("Failed to insert cache row: {}", e); StoreError::WriteFailed })?;
        let cache_id = inserted.last_insert_id;

        if !items.is_empty() {
            let rows = items.iter().enumerate().map(|(position, item)| feed_items::ActiveModel {
                id: NotSet,
                cache_id: Set(cache_id),
                position: Set(position as i32),
                item_id: Set(item.id.to_string()),
                description: Set(item.description.clone()),
                location: Set(item.location.clone()),
                url: Set(item.url.to_string()),
            });
            feed_items::Entity::insert_many(rows).exec(&txn).await.map_err(|e| { error!("Failed to insert feed items: {}", e); StoreError::WriteFailed })?;
        }

        txn.commit().await.map_err(|e| { error!("Failed to commit insert: {}", e); StoreError::WriteFailed })?;
        debug!("Inserted feed snapshot with {} item(s), stamped {}", items.len(), timestamp.to_rfc3339());
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<FeedSnapshot>, StoreError> {
        let _guard = self.gate.read().await;
        let row = cache::Entity::find().one(&self.conn).await.map_err(|e| { error!("Failed to query cache row: {}", e); StoreError::ReadFailed })?;
        let Some(row) = row else {
            return Ok(None);
        };
        let timestamp = timestamp_from_row(&row.timestamp)?;

        let rows = feed_items::Entity::find()
            .filter(feed_items::Column::CacheId.eq(row.id))
            .order_by_asc(feed_items::Column::Position)
            .all(&self.conn)
            .await
            .map_err(|e| { error!("Failed to query feed items: {}", e); StoreError::ReadFailed })?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(item_from_row(row)?);
        }
        debug!("Retrieved feed snapshot with {} item(s)", items.len());
        Ok(Some(FeedSnapshot { items, timestamp }))
    }

    async fn retrieve_image_data(&self, url: &Url) -> Result<Option<Vec<u8>>, StoreError> {
        let _guard = self.gate.read().await;
        let row = image_blobs::Entity::find_by_id(url.to_string())
            .one(&self.conn)
            .await
            .map_err(|e| { error!("Failed to query image data for {}: {}", url, e); StoreError::ReadFailed })?;
        Ok(row.map(|r| r.data))
    }

    async fn insert_image_data(&self, url: &Url, data: &[u8]) -> Result<(), StoreError> {
        let _guard = self.gate.write().await;
        image_blobs::Entity::insert(image_blobs::ActiveModel {
            url: Set(url.to_string()),
            data: Set(data.to_vec()),
        })
        .on_conflict(
            OnConflict::column(image_blobs::Column::Url)
                .update_column(image_blobs::Column::Data)
                .to_owned(),
        )
        .exec(&self.conn)
        .await
        .map_err(|e| { error!("Failed to store image data for {}: {}", url, e); StoreError::WriteFailed })?;
        debug!("Stored {} byte(s) of image data for {}", data.len(), url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_db() -> DatabaseStorage {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sqlite3");
        // Keep TempDir alive by leaking it for the test duration
        Box::leak(Box::new(dir));
        DatabaseStorage::new_file(path).await.unwrap()
    }

    fn item(tag: &str) -> FeedItem {
        FeedItem {
            id: Uuid::new_v4(),
            description: Some(format!("description-{}", tag)),
            location: Some(format!("location-{}", tag)),
            url: Url::parse(&format!("https://example.com/{}", tag)).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_retrieve_on_empty_store_returns_none() {
        let storage = temp_db().await;

        assert_eq!(storage.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_then_retrieve_preserves_items_and_order() {
        let storage = temp_db().await;
        let items = vec![item("a"), item("b"), item("c")];
        let timestamp = Utc::now();

        storage.insert(&items, timestamp).await.unwrap();
        let snapshot = storage.retrieve().await.unwrap().unwrap();

        assert_eq!(snapshot.items, items);
        assert_eq!(snapshot.timestamp, timestamp);
    }

    #[tokio::test]
    async fn test_insert_replaces_previous_snapshot() {
        let storage = temp_db().await;
        let first = vec![item("first"), item("second")];
        let second = vec![item("third")];

        storage.insert(&first, Utc::now()).await.unwrap();
        storage.insert(&second, Utc::now()).await.unwrap();

        let snapshot = storage.retrieve().await.unwrap().unwrap();
        assert_eq!(snapshot.items, second);
    }

    #[tokio::test]
    async fn test_delete_on_empty_store_is_a_noop_success() {
        let storage = temp_db().await;

        assert!(storage.delete_cached_feed().await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_cached_feed() {
        let storage = temp_db().await;

        storage.insert(&[item("a")], Utc::now()).await.unwrap();
        storage.delete_cached_feed().await.unwrap();

        assert_eq!(storage.retrieve().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persist.sqlite3");
        let items = vec![item("persisted")];
        let timestamp = Utc::now();

        let storage = DatabaseStorage::new_file(&path).await.unwrap();
        storage.insert(&items, timestamp).await.unwrap();
        drop(storage);

        let reopened = DatabaseStorage::new_file(&path).await.unwrap();
        let snapshot = reopened.retrieve().await.unwrap().unwrap();
        assert_eq!(snapshot.items, items);
        assert_eq!(snapshot.timestamp, timestamp);
    }

    #[tokio::test]
    async fn test_image_blob_roundtrip_and_upsert() {
        let storage = temp_db().await;
        let url = Url::parse("https://example.com/image.png").unwrap();

        assert_eq!(storage.retrieve_image_data(&url).await.unwrap(), None);

        storage.insert_image_data(&url, b"first").await.unwrap();
        assert_eq!(storage.retrieve_image_data(&url).await.unwrap(), Some(b"first".to_vec()));

        storage.insert_image_data(&url, b"second").await.unwrap();
        assert_eq!(storage.retrieve_image_data(&url).await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_operations_take_effect_in_issue_order() {
        let storage = temp_db().await;
        let first = vec![item("first")];
        let second = vec![item("second")];
        let ts = Utc::now();

        let (a, b, c) = tokio::join!(
            storage.insert(&first, ts),
            storage.delete_cached_feed(),
            storage.insert(&second, ts),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let snapshot = storage.retrieve().await.unwrap().unwrap();
        assert_eq!(snapshot.items, second);
    }
}
