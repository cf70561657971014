/// SQLite implementation of the diary storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving diary data. Images and the analysis are stored as JSON
/// documents; everything else maps to plain columns.

use std::path::PathBuf;
use rusqlite::{Connection, OptionalExtension, Row, params};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::domain::{Analysis, DiaryEntry, EntryId, Personality, Settings, Weather};
use crate::storage::{DiaryStorage, StorageError, migrations};

/// Primary key of the single settings row
const SETTINGS_ID: &str = "default";

const ENTRY_COLUMNS: &str = "id, date, content, images, weather, sleep_start, sleep_end, \
     sleep_hours, personality, analysis, user_id, updated_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the DiaryStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and migrate it
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Storage backed by a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn insert_entry(conn: &Connection, entry: &DiaryEntry) -> Result<(), StorageError> {
        let images_json = serde_json::to_string(&entry.images)?;
        let analysis_json = serde_json::to_string(&entry.analysis)?;

        conn.execute(
            "INSERT OR REPLACE INTO diaries (
                id, date, content, images, weather, sleep_start, sleep_end,
                sleep_hours, personality, analysis, user_id, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                entry.id.0,
                entry.date.to_string(),
                entry.content,
                images_json,
                entry.weather.map(|w| w.key()),
                entry.sleep_start,
                entry.sleep_end,
                entry.sleep_hours,
                entry.personality.key(),
                analysis_json,
                entry.user_id,
                Self::timestamp(&entry.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Raw column values of one row, decoded afterwards so that decoding
    /// errors surface as StorageError rather than rusqlite errors
    fn read_row(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
        Ok(RawEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            content: row.get(2)?,
            images: row.get(3)?,
            weather: row.get(4)?,
            sleep_start: row.get(5)?,
            sleep_end: row.get(6)?,
            sleep_hours: row.get(7)?,
            personality: row.get(8)?,
            analysis: row.get(9)?,
            user_id: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<DiaryEntry>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::read_row)?;

        let mut entries = Vec::new();
        for raw in rows {
            entries.push(raw?.decode()?);
        }
        Ok(entries)
    }
}

struct RawEntry {
    id: i64,
    date: String,
    content: String,
    images: String,
    weather: Option<String>,
    sleep_start: Option<String>,
    sleep_end: Option<String>,
    sleep_hours: Option<f64>,
    personality: String,
    analysis: String,
    user_id: String,
    updated_at: Option<String>,
}

impl RawEntry {
    fn decode(self) -> Result<DiaryEntry, StorageError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| StorageError::InvalidData { column: "date", value: self.date.clone() })?;

        let weather = match self.weather {
            Some(w) => Some(
                w.parse::<Weather>()
                    .map_err(|_| StorageError::InvalidData { column: "weather", value: w.clone() })?,
            ),
            None => None,
        };

        let personality = self
            .personality
            .parse::<Personality>()
            .map_err(|_| StorageError::InvalidData { column: "personality", value: self.personality.clone() })?;

        let updated_at = match self.updated_at {
            Some(ts) => DateTime::parse_from_rfc3339(&ts)
                .map_err(|_| StorageError::InvalidData { column: "updated_at", value: ts.clone() })?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        let images: Vec<String> = serde_json::from_str(&self.images)?;
        let analysis: Analysis = serde_json::from_str(&self.analysis)?;

        Ok(DiaryEntry {
            id: EntryId(self.id),
            date,
            content: self.content,
            images,
            weather,
            sleep_start: self.sleep_start,
            sleep_end: self.sleep_end,
            sleep_hours: self.sleep_hours,
            personality,
            analysis,
            user_id: self.user_id,
            updated_at,
        })
    }
}

impl DiaryStorage for SqliteStorage {
    fn list_entries(&self) -> Result<Vec<DiaryEntry>, StorageError> {
        let sql = format!("SELECT {} FROM diaries ORDER BY date DESC, id DESC", ENTRY_COLUMNS);
        self.query_entries(&sql, [])
    }

    fn get_entry(&self, id: EntryId) -> Result<Option<DiaryEntry>, StorageError> {
        let sql = format!("SELECT {} FROM diaries WHERE id = ?1", ENTRY_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![id.0], Self::read_row)
            .optional()?;

        raw.map(RawEntry::decode).transpose()
    }

    fn put_entry(&self, entry: &DiaryEntry) -> Result<(), StorageError> {
        Self::insert_entry(&self.conn, entry)?;
        tracing::debug!("Saved diary entry {} for {}", entry.id, entry.date);
        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute("DELETE FROM diaries WHERE id = ?1", params![id.0])?;

        if rows_affected == 0 {
            return Err(StorageError::EntryNotFound {
                entry_id: id.to_string(),
            });
        }

        tracing::debug!("Deleted diary entry {}", id);
        Ok(())
    }

    fn bulk_put_entries(&self, entries: &[DiaryEntry]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        for entry in entries {
            Self::insert_entry(&tx, entry)?;
        }
        tx.commit()?;

        tracing::debug!("Bulk saved {} diary entries", entries.len());
        Ok(())
    }

    fn replace_all_entries(&self, entries: &[DiaryEntry]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM diaries", [])?;
        for entry in entries {
            Self::insert_entry(&tx, entry)?;
        }
        tx.commit()?;

        tracing::debug!("Replaced {} diary entries with {}", removed, entries.len());
        Ok(())
    }

    fn clear_entries(&self) -> Result<usize, StorageError> {
        let removed = self.conn.execute("DELETE FROM diaries", [])?;
        tracing::debug!("Cleared {} diary entries", removed);
        Ok(removed)
    }

    fn entries_updated_since(&self, since: DateTime<Utc>) -> Result<Vec<DiaryEntry>, StorageError> {
        let sql = format!(
            "SELECT {} FROM diaries WHERE updated_at > ?1 ORDER BY updated_at ASC, id ASC",
            ENTRY_COLUMNS
        );
        self.query_entries(&sql, params![Self::timestamp(&since)])
    }

    fn get_settings(&self) -> Result<Option<Settings>, StorageError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM settings WHERE id = ?1",
                params![SETTINGS_ID],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (id, data) VALUES (?1, ?2)",
            params![SETTINGS_ID, json],
        )?;

        tracing::debug!("Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisInput, LocalAnalyzer};
    use crate::domain::{EntryDraft, Metric, Plan};
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_storage() -> (SqliteStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path).unwrap();
        (storage, temp_dir)
    }

    fn entry(date: &str, content: &str) -> DiaryEntry {
        let draft = EntryDraft {
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            weather: Some(Weather::Rain),
            sleep_start: Some("23:30".to_string()),
            sleep_end: Some("07:00".to_string()),
            images: vec!["data:image/png;base64,AAAA".to_string()],
            ..EntryDraft::with_content(content)
        };
        let analysis = LocalAnalyzer::new().analyze(&AnalysisInput::from_draft(&draft, Personality::default()));
        DiaryEntry::from_draft(draft, Personality::default(), analysis).unwrap()
    }

    #[test]
    fn test_put_and_get_entry() {
        let (storage, _temp_dir) = create_test_storage();
        let saved = entry("2025-06-11", "오늘 운동을 해서 행복했다");

        storage.put_entry(&saved).unwrap();
        let loaded = storage.get_entry(saved.id).unwrap().unwrap();

        assert_eq!(loaded.content, saved.content);
        assert_eq!(loaded.weather, Some(Weather::Rain));
        assert_eq!(loaded.images, saved.images);
        assert_eq!(loaded.analysis, saved.analysis);
        assert_eq!(loaded.analysis.metric_scores.get(Metric::Health), Some(3));
        // stored with microsecond precision
        assert_eq!(
            SqliteStorage::timestamp(&loaded.updated_at),
            SqliteStorage::timestamp(&saved.updated_at)
        );
    }

    #[test]
    fn test_get_missing_entry() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(storage.get_entry(EntryId(42)).unwrap().is_none());
    }

    #[test]
    fn test_put_replaces() {
        let (storage, _temp_dir) = create_test_storage();
        let mut saved = entry("2025-06-11", "first");
        storage.put_entry(&saved).unwrap();

        saved.content = "second".to_string();
        storage.put_entry(&saved).unwrap();

        let all = storage.list_entries().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "second");
    }

    #[test]
    fn test_list_is_newest_first() {
        let (storage, _temp_dir) = create_test_storage();
        let a = entry("2025-06-01", "a");
        let b = entry("2025-06-20", "b");
        let c = entry("2025-06-10", "c");
        storage.bulk_put_entries(&[a, b, c]).unwrap();

        let dates: Vec<String> = storage.list_entries().unwrap().iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-06-20", "2025-06-10", "2025-06-01"]);
    }

    #[test]
    fn test_delete_entry() {
        let (storage, _temp_dir) = create_test_storage();
        let saved = entry("2025-06-11", "bye");
        storage.put_entry(&saved).unwrap();

        storage.delete_entry(saved.id).unwrap();
        assert!(storage.get_entry(saved.id).unwrap().is_none());

        let result = storage.delete_entry(saved.id);
        assert!(matches!(result, Err(StorageError::EntryNotFound { .. })));
    }

    #[test]
    fn test_replace_all_and_clear() {
        let (storage, _temp_dir) = create_test_storage();
        storage.bulk_put_entries(&[entry("2025-06-01", "a"), entry("2025-06-02", "b")]).unwrap();

        storage.replace_all_entries(&[entry("2025-07-01", "c")]).unwrap();
        let all = storage.list_entries().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "c");

        assert_eq!(storage.clear_entries().unwrap(), 1);
        assert!(storage.list_entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_updated_since() {
        let (storage, _temp_dir) = create_test_storage();
        let mut old = entry("2025-06-01", "old");
        old.updated_at = Utc::now() - Duration::days(3);
        let fresh = entry("2025-06-02", "fresh");
        storage.bulk_put_entries(&[old, fresh]).unwrap();

        let changed = storage.entries_updated_since(Utc::now() - Duration::days(1)).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].content, "fresh");
    }

    #[test]
    fn test_settings_round_trip() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(storage.get_settings().unwrap().is_none());
        assert_eq!(storage.load_settings().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.plan = Plan::Pro;
        settings.api_key = Some("key".to_string());
        settings.personality = Personality::GrowthCoach;
        storage.put_settings(&settings).unwrap();

        assert_eq!(storage.get_settings().unwrap(), Some(settings));
    }

    #[test]
    fn test_in_memory_storage() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.put_entry(&entry("2025-06-11", "memo")).unwrap();
        assert_eq!(storage.list_entries().unwrap().len(), 1);
    }
}
