/// Backup and export of diary data
///
/// A JSON backup holds every entry plus the settings record and can be
/// imported back; the markdown export is one-way.

pub mod markdown;

pub use markdown::{entry_to_markdown, export_all_to_markdown, SECTION_SEPARATOR};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{DiaryEntry, Settings};
use crate::storage::{DiaryStorage, StorageError};

/// Version written into new backup documents
pub const BACKUP_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Invalid backup data: {0}")]
    InvalidShape(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Full snapshot of the diary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub diaries: Vec<DiaryEntry>,
    pub settings: Option<Settings>,
}

/// Snapshot every entry and the settings record
pub fn export_backup<S: DiaryStorage>(storage: &S) -> Result<BackupDocument, StorageError> {
    let diaries = storage.list_entries()?;
    let settings = storage.get_settings()?;

    tracing::info!("Exporting backup with {} entries", diaries.len());

    Ok(BackupDocument {
        version: BACKUP_VERSION,
        exported_at: Utc::now(),
        diaries,
        settings,
    })
}

/// Import a backup document, replacing all entries
///
/// `diaries` must be present and an array of valid entries. The whole
/// document is validated before anything is written. Returns the number of
/// entries imported.
pub fn try_import<S: DiaryStorage>(storage: &S, document: &Value) -> Result<usize, BackupError> {
    let diaries = document
        .get("diaries")
        .and_then(Value::as_array)
        .ok_or_else(|| BackupError::InvalidShape("'diaries' must be an array".to_string()))?;

    let entries: Vec<DiaryEntry> = diaries
        .iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value.clone())
                .map_err(|e| BackupError::InvalidShape(format!("diary #{}: {}", i, e)))
        })
        .collect::<Result<_, _>>()?;

    let settings = match document.get("settings") {
        None | Some(Value::Null) => None,
        Some(value) => Some(import_settings(storage, value)?),
    };

    storage.replace_all_entries(&entries)?;
    if let Some(settings) = settings {
        storage.put_settings(&settings)?;
    }

    tracing::info!("Imported {} entries from backup", entries.len());
    Ok(entries.len())
}

/// Settings from a backup, checked like an update from the client
///
/// A document without an API key keeps the stored one.
fn import_settings<S: DiaryStorage>(storage: &S, value: &Value) -> Result<Settings, BackupError> {
    let mut imported: Settings = serde_json::from_value(value.clone())
        .map_err(|e| BackupError::InvalidShape(format!("settings: {}", e)))?;

    let weights = std::mem::take(&mut imported.weights);
    imported
        .set_weights(weights)
        .map_err(|e| BackupError::InvalidShape(format!("settings: {}", e)))?;

    if imported.api_key.is_none() {
        imported.api_key = storage.get_settings()?.and_then(|current| current.api_key);
    }
    Ok(imported)
}

/// Import a backup, reporting success as a boolean
pub fn import_backup<S: DiaryStorage>(storage: &S, document: &Value) -> bool {
    match try_import(storage, document) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Import failed: {}", e);
            false
        }
    }
}
