/// Storage layer for persisting diary data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving diary entries and the single
/// settings record.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{DateTime, Utc};
use thiserror::Error;
use crate::domain::{DiaryEntry, EntryId, Settings};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Entry not found: {entry_id}")]
    EntryNotFound { entry_id: String },

    #[error("Invalid stored value in column {column}: {value}")]
    InvalidData { column: &'static str, value: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for diary data
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait DiaryStorage {
    /// All entries, newest date first (ties: newest id first)
    fn list_entries(&self) -> Result<Vec<DiaryEntry>, StorageError>;

    /// Get an entry by ID, `None` if absent
    fn get_entry(&self, id: EntryId) -> Result<Option<DiaryEntry>, StorageError>;

    /// Insert or replace an entry
    fn put_entry(&self, entry: &DiaryEntry) -> Result<(), StorageError>;

    /// Hard-delete an entry
    fn delete_entry(&self, id: EntryId) -> Result<(), StorageError>;

    /// Insert or replace many entries in one transaction
    fn bulk_put_entries(&self, entries: &[DiaryEntry]) -> Result<(), StorageError>;

    /// Replace every entry with `entries` in one transaction
    fn replace_all_entries(&self, entries: &[DiaryEntry]) -> Result<(), StorageError>;

    /// Delete all entries
    fn clear_entries(&self) -> Result<usize, StorageError>;

    /// Entries written after `since`, oldest write first
    fn entries_updated_since(&self, since: DateTime<Utc>) -> Result<Vec<DiaryEntry>, StorageError>;

    /// The settings record, `None` before the first save
    fn get_settings(&self) -> Result<Option<Settings>, StorageError>;

    fn put_settings(&self, settings: &Settings) -> Result<(), StorageError>;

    /// Settings, or defaults when none were saved yet
    fn load_settings(&self) -> Result<Settings, StorageError> {
        Ok(self.get_settings()?.unwrap_or_default())
    }
}
