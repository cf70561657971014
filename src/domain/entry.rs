/// DiaryEntry entity for daily journal records
///
/// This module defines the DiaryEntry struct that represents one day's
/// written entry together with its contextual metadata and analysis, and the
/// EntryDraft used to create or edit one.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use crate::domain::{Analysis, DomainError, EntryId, Personality, Weather};

/// Maximum number of images attached to one entry
pub const MAX_IMAGES: usize = 3;

/// Owner recorded on entries created on this device
pub const LOCAL_USER_ID: &str = "local-user";

fn default_user_id() -> String {
    LOCAL_USER_ID.to_string()
}

/// User-supplied fields of an entry, before analysis
///
/// Both creating and editing go through a draft. The draft is validated
/// before any analysis is attempted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryDraft {
    pub date: Option<NaiveDate>,
    pub content: String,
    pub images: Vec<String>,
    pub weather: Option<Weather>,
    pub sleep_start: Option<String>,
    pub sleep_end: Option<String>,
    pub sleep_hours: Option<f64>,
    pub personality: Option<Personality>,
}

impl EntryDraft {
    /// Draft with only content set
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Check the draft can be analyzed and stored
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }

        if self.images.len() > MAX_IMAGES {
            return Err(DomainError::TooManyImages {
                count: self.images.len(),
                max: MAX_IMAGES,
            });
        }

        if let Some(hours) = self.sleep_hours {
            if !(0.0..=24.0).contains(&hours) {
                return Err(DomainError::InvalidValue {
                    message: format!("Sleep hours must be between 0 and 24, got {}", hours),
                });
            }
        }

        for time in [&self.sleep_start, &self.sleep_end].into_iter().flatten() {
            parse_clock(time)?;
        }

        Ok(())
    }

    /// Sleep duration, either given directly or derived from start/end
    pub fn resolved_sleep_hours(&self) -> Option<f64> {
        resolve_sleep_hours(self.sleep_hours, self.sleep_start.as_deref(), self.sleep_end.as_deref())
    }
}

/// One diary record for a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Unique, creation-time-derived identifier
    pub id: EntryId,
    /// Which day this entry is about
    pub date: NaiveDate,
    /// Free text written by the user
    pub content: String,
    /// Embedded image payloads (data URLs), at most three
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub weather: Option<Weather>,
    /// Bedtime as HH:MM
    #[serde(default)]
    pub sleep_start: Option<String>,
    /// Wake-up time as HH:MM
    #[serde(default)]
    pub sleep_end: Option<String>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    /// Feedback tone used when this entry was analyzed
    #[serde(default)]
    pub personality: Personality,
    /// Always present; recomputed on every write
    pub analysis: Analysis,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Last write time, used for incremental sync
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl DiaryEntry {
    /// Create a new entry from a validated draft and its analysis
    ///
    /// The date defaults to today (UTC) and the personality to the one from
    /// settings when the draft does not carry one.
    pub fn from_draft(
        draft: EntryDraft,
        default_personality: Personality,
        analysis: Analysis,
    ) -> Result<Self, DomainError> {
        draft.validate()?;

        Ok(Self {
            id: EntryId::new(),
            date: draft.date.unwrap_or_else(|| Utc::now().date_naive()),
            content: draft.content,
            images: draft.images,
            weather: draft.weather,
            sleep_start: draft.sleep_start,
            sleep_end: draft.sleep_end,
            sleep_hours: draft.sleep_hours,
            personality: draft.personality.unwrap_or(default_personality),
            analysis,
            user_id: default_user_id(),
            updated_at: Utc::now(),
        })
    }

    /// Overwrite this entry with an edited draft and a fresh analysis
    ///
    /// The analysis is replaced in full, never merged.
    pub fn apply_edit(&mut self, draft: EntryDraft, analysis: Analysis) -> Result<(), DomainError> {
        draft.validate()?;

        if let Some(date) = draft.date {
            self.date = date;
        }
        self.content = draft.content;
        self.images = draft.images;
        self.weather = draft.weather;
        self.sleep_start = draft.sleep_start;
        self.sleep_end = draft.sleep_end;
        self.sleep_hours = draft.sleep_hours;
        if let Some(personality) = draft.personality {
            self.personality = personality;
        }
        self.analysis = analysis;
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Draft pre-filled with this entry's current fields (used for edits)
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            date: Some(self.date),
            content: self.content.clone(),
            images: self.images.clone(),
            weather: self.weather,
            sleep_start: self.sleep_start.clone(),
            sleep_end: self.sleep_end.clone(),
            sleep_hours: self.sleep_hours,
            personality: Some(self.personality),
        }
    }

    pub fn resolved_sleep_hours(&self) -> Option<f64> {
        resolve_sleep_hours(self.sleep_hours, self.sleep_start.as_deref(), self.sleep_end.as_deref())
    }

    /// Check if this entry has any images attached
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Parse an HH:MM clock time
fn parse_clock(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| DomainError::InvalidValue {
        message: format!("Invalid time '{}', expected HH:MM", value),
    })
}

fn resolve_sleep_hours(hours: Option<f64>, start: Option<&str>, end: Option<&str>) -> Option<f64> {
    if hours.is_some() {
        return hours;
    }

    let start = parse_clock(start?).ok()?;
    let end = parse_clock(end?).ok()?;

    let mut minutes = (end - start).num_minutes();
    if minutes < 0 {
        // Went to bed before midnight
        minutes += 24 * 60;
    }

    Some((minutes as f64 / 60.0 * 10.0).round() / 10.0)
}
