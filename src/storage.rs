//! Storage subsystem
//!
//! This module provides abstractions and implementations for persisting the
//! cached feed snapshot and per-URL image payloads.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining a uniform API.
//! - `file_storage`: filesystem-backed implementation (JSON snapshot plus blob files).
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity models for the database backend.

pub mod database_storage;
pub mod db_entities;
pub mod file_storage;
pub mod storage_trait;

pub use database_storage::DatabaseStorage;
pub use file_storage::FileStorage;
pub use storage_trait::Storage;
