//! Feed domain module.
//!
//! This module provides the core value types for feed content, plus the
//! capability traits that loading and caching components implement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Submodule for the feed loading and caching capability traits.
pub mod loader;

pub use loader::{FeedCache, FeedLoader};

/// A single item of remotely-sourced feed content.
///
/// Items are immutable values: two items with equal fields are the same item,
/// wherever they were materialized from. `description` and `location` are
/// optional; `url` points at the item's image payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

/// A whole cached feed: the item sequence plus the instant it was stored.
///
/// A store holds at most one snapshot at a time; inserting a new one replaces
/// the previous snapshot wholesale, never merges into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub items: Vec<FeedItem>,
    pub timestamp: DateTime<Utc>,
}
