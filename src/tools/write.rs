/// Tools for writing, editing and deleting diary entries
///
/// This module implements the diary_write, diary_update and diary_delete MCP
/// tools. Every write re-runs the analysis in full.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analyzer::AnalysisInput;
use crate::domain::{Analysis, DiaryEntry, EntryDraft, EntryId, Personality, Settings, Weather};
use crate::remote::{analyze_entry, AnalysisOrigin, AnalysisProvider};
use crate::storage::{DiaryStorage, StorageError};
use crate::tools::{format_analysis, parse_date, parse_tag, ToolError};

/// Parameters for writing a new entry
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WriteEntryParams {
    /// What happened today
    pub content: String,
    /// Day of the entry (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    /// clear, cloudy, rain or snow
    pub weather: Option<String>,
    /// Bedtime (HH:MM)
    pub sleep_start: Option<String>,
    /// Wake-up time (HH:MM)
    pub sleep_end: Option<String>,
    /// Hours slept; derived from sleep_start/sleep_end when omitted
    pub sleep_hours: Option<f64>,
    /// Feedback tone: warm_companion, growth_coach or neutral_observer
    pub personality: Option<String>,
    /// Up to 3 images as data URLs
    #[serde(default)]
    pub images: Vec<String>,
}

/// Parameters for editing an entry; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateEntryParams {
    /// ID of the entry to edit
    pub id: String,
    pub content: Option<String>,
    /// New day (YYYY-MM-DD)
    pub date: Option<String>,
    pub weather: Option<String>,
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
    pub sleep_hours: Option<f64>,
    pub personality: Option<String>,
    /// Replaces all images when given
    pub images: Option<Vec<String>>,
}

/// Parameters for deleting an entry
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteEntryParams {
    /// ID of the entry to delete
    pub id: String,
}

/// Response from writing or editing an entry
#[derive(Debug, Serialize)]
pub struct WriteEntryResponse {
    pub entry: DiaryEntry,
    pub origin: AnalysisOrigin,
    pub message: String,
}

/// Response from deleting an entry
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub message: String,
}

fn draft_from_write(params: WriteEntryParams, today: NaiveDate) -> Result<EntryDraft, ToolError> {
    Ok(EntryDraft {
        date: Some(parse_date(params.date.as_deref())?.unwrap_or(today)),
        content: params.content,
        images: params.images,
        weather: parse_tag::<Weather>(params.weather.as_deref())?,
        sleep_start: params.sleep_start,
        sleep_end: params.sleep_end,
        sleep_hours: params.sleep_hours,
        personality: parse_tag::<Personality>(params.personality.as_deref())?,
    })
}

/// Run the analysis for a validated draft and persist the usage counter
/// when a remote analysis was spent
async fn analyze_draft<S: DiaryStorage>(
    storage: &S,
    provider: Option<&dyn AnalysisProvider>,
    draft: &EntryDraft,
    today: NaiveDate,
) -> Result<(Analysis, AnalysisOrigin, Settings), ToolError> {
    let mut settings = storage.load_settings()?;
    let input = AnalysisInput::from_draft(draft, settings.personality);

    let (analysis, origin) = analyze_entry(&mut settings, provider, &input, today).await;
    if origin == AnalysisOrigin::Remote {
        storage.put_settings(&settings)?;
    }
    Ok((analysis, origin, settings))
}

/// Write a new entry, analyzing it first
pub async fn write_entry<S: DiaryStorage>(
    storage: &S,
    provider: Option<&dyn AnalysisProvider>,
    params: WriteEntryParams,
    today: NaiveDate,
) -> Result<WriteEntryResponse, ToolError> {
    let draft = draft_from_write(params, today)?;
    // empty content is rejected before any analysis
    draft.validate()?;

    let (analysis, origin, settings) = analyze_draft(storage, provider, &draft, today).await?;
    let entry = DiaryEntry::from_draft(draft, settings.personality, analysis)?;
    storage.put_entry(&entry)?;

    let message = format!(
        "✅ Saved diary for {} (ID: {})\n{}\n\n{}",
        entry.date,
        entry.id,
        origin.describe(),
        format_analysis(&entry, &settings.weights)
    );

    Ok(WriteEntryResponse { entry, origin, message })
}

/// Edit an entry; the analysis is recomputed and replaced in full
pub async fn update_entry<S: DiaryStorage>(
    storage: &S,
    provider: Option<&dyn AnalysisProvider>,
    params: UpdateEntryParams,
    today: NaiveDate,
) -> Result<WriteEntryResponse, ToolError> {
    let id = EntryId::from_string(&params.id)?;
    let mut entry = storage
        .get_entry(id)?
        .ok_or_else(|| StorageError::EntryNotFound { entry_id: params.id.clone() })?;

    let mut draft = entry.to_draft();
    if let Some(content) = params.content {
        draft.content = content;
    }
    if let Some(date) = parse_date(params.date.as_deref())? {
        draft.date = Some(date);
    }
    if let Some(weather) = parse_tag::<Weather>(params.weather.as_deref())? {
        draft.weather = Some(weather);
    }
    if let Some(personality) = parse_tag::<Personality>(params.personality.as_deref())? {
        draft.personality = Some(personality);
    }
    if params.sleep_start.is_some() || params.sleep_end.is_some() {
        draft.sleep_start = params.sleep_start.or(draft.sleep_start);
        draft.sleep_end = params.sleep_end.or(draft.sleep_end);
        // recomputed from the new times unless given explicitly
        draft.sleep_hours = None;
    }
    if params.sleep_hours.is_some() {
        draft.sleep_hours = params.sleep_hours;
    }
    if let Some(images) = params.images {
        draft.images = images;
    }
    draft.validate()?;

    let (analysis, origin, settings) = analyze_draft(storage, provider, &draft, today).await?;
    entry.apply_edit(draft, analysis)?;
    storage.put_entry(&entry)?;

    let message = format!(
        "✏️ Updated diary for {} (ID: {})\n{}\n\n{}",
        entry.date,
        entry.id,
        origin.describe(),
        format_analysis(&entry, &settings.weights)
    );

    Ok(WriteEntryResponse { entry, origin, message })
}

/// Delete an entry permanently
pub fn delete_entry<S: DiaryStorage>(
    storage: &S,
    params: DeleteEntryParams,
) -> Result<DeleteEntryResponse, ToolError> {
    let id = EntryId::from_string(&params.id)?;
    storage.delete_entry(id)?;

    Ok(DeleteEntryResponse {
        success: true,
        message: format!("🗑️ Deleted diary entry {}", id),
    })
}
