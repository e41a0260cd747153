//! SeaORM entity models used by the database storage backend.
//!
//! These structs map to the SQLite tables created by `database_storage`:
//! - `cache` — the single feed snapshot's metadata (its timestamp)
//! - `feed_items` — the snapshot's items, one row per item, position-ordered
//! - `image_blobs` — image payloads keyed by URL, independent of the snapshot

use sea_orm::entity::prelude::*;

/// Cache table entity model.
///
/// At most one row exists at a time; replacing the snapshot deletes it and
/// inserts a fresh one inside the same transaction. The timestamp is stored
/// as an RFC3339 string for portability.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cache")]
pub struct Model {
    /// Auto-increment row id
    #[sea_orm(primary_key)]
    pub id: i32,
    /// RFC3339 snapshot timestamp
    pub timestamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<self::feed_items::Entity> for Entity {
    fn to() -> RelationDef {
        self::feed_items::Relation::Cache.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Feed items table entity models.
pub mod feed_items {
    use sea_orm::entity::prelude::*;

    /// One feed item of the cached snapshot.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "feed_items")]
    pub struct Model {
        /// Auto-increment row id
        #[sea_orm(primary_key)]
        pub id: i32,
        /// Foreign key to `cache.id`
        pub cache_id: i32,
        /// Zero-based position within the snapshot's item sequence
        pub position: i32,
        /// Item UUID as string
        pub item_id: String,
        /// Optional description text
        pub description: Option<String>,
        /// Optional location text
        pub location: Option<String>,
        /// Image URL as string
        pub url: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        /// Belongs to the cached snapshot
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::CacheId",
            to = "super::Column::Id"
        )]
        Cache,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Image blobs table entity models.
pub mod image_blobs {
    use sea_orm::entity::prelude::*;

    /// Image payload cached for a URL, replaced wholesale on re-insert.
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "image_blobs")]
    pub struct Model {
        /// Image URL string primary key
        #[sea_orm(primary_key, auto_increment = false)]
        pub url: String,
        /// Raw payload bytes
        pub data: Vec<u8>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
