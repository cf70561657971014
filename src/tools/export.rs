/// Tools for backing up, restoring and exporting the diary
///
/// This module implements the diary_export and diary_import MCP tools.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backup::{export_all_to_markdown, export_backup, try_import};
use crate::storage::{DiaryStorage, StorageError};
use crate::tools::ToolError;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Markdown,
}

/// Parameters for exporting the diary
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ExportParams {
    /// "json" (restorable backup, default) or "markdown" (readable export)
    pub format: Option<String>,
    /// Also write the document to this file
    pub path: Option<String>,
}

/// Parameters for importing a JSON backup
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ImportParams {
    /// Backup document as produced by diary_export
    pub data: Option<Value>,
    /// Read the backup document from this file instead
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub format: ExportFormat,
    pub entry_count: usize,
    pub document: String,
    pub path: Option<PathBuf>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
    pub message: String,
}

fn parse_format(value: Option<&str>) -> Result<ExportFormat, ToolError> {
    match value.map(|f| f.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("json") => Ok(ExportFormat::Json),
        Some("markdown") | Some("md") => Ok(ExportFormat::Markdown),
        Some(other) => Err(ToolError::InvalidParams(format!(
            "format must be 'json' or 'markdown', got '{}'",
            other
        ))),
    }
}

/// Export every entry as a JSON backup or a markdown document
pub fn export_diary<S: DiaryStorage>(
    storage: &S,
    params: ExportParams,
    today: NaiveDate,
) -> Result<ExportResponse, ToolError> {
    let format = parse_format(params.format.as_deref())?;

    let target = params.path.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from);

    let mut backup = export_backup(storage)?;
    if target.is_none() {
        // returned to the client inline
        if let Some(settings) = backup.settings.as_mut() {
            settings.api_key = None;
        }
    }

    let entry_count = backup.diaries.len();
    let document = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&backup).map_err(StorageError::from)?,
        ExportFormat::Markdown => {
            let mut entries = backup.diaries;
            entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
            export_all_to_markdown(&entries, today)
        }
    };

    let path = match target {
        Some(path) => {
            fs::write(&path, &document)?;
            tracing::info!("Wrote export to {}", path.display());
            Some(path)
        }
        None => None,
    };

    let mut message = format!("📦 Exported {} entries as {:?}", entry_count, format);
    match &path {
        Some(p) => message.push_str(&format!("\n💾 Saved to {}", p.display())),
        None => message.push_str(&format!("\n\n{}", document)),
    }

    Ok(ExportResponse {
        format,
        entry_count,
        document,
        path,
        message,
    })
}

/// Restore a JSON backup, replacing every entry
///
/// A document that is not a valid backup leaves the diary untouched and is
/// reported as `success: false`.
pub fn import_diary<S: DiaryStorage>(storage: &S, params: ImportParams) -> Result<ImportResponse, ToolError> {
    let document = match (params.data, params.path.as_deref().map(str::trim).filter(|p| !p.is_empty())) {
        (Some(data), _) => data,
        (None, Some(path)) => {
            let text = fs::read_to_string(path)?;
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Backup file {} is not JSON: {}", path, e);
                    return Ok(ImportResponse {
                        success: false,
                        imported: 0,
                        message: format!("❌ {} is not a JSON backup", path),
                    });
                }
            }
        }
        (None, None) => {
            return Err(ToolError::InvalidParams("either 'data' or 'path' is required".to_string()));
        }
    };

    Ok(match try_import(storage, &document) {
        Ok(imported) => ImportResponse {
            success: true,
            imported,
            message: format!("✅ Restored {} entries from backup", imported),
        },
        Err(e) => {
            tracing::warn!("Import failed: {}", e);
            ImportResponse {
                success: false,
                imported: 0,
                message: format!("❌ Import failed, nothing was changed: {}", e),
            }
        }
    })
}
