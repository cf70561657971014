/// Backup, restore and markdown export across two databases
use chrono::NaiveDate;
use diary_insight_mcp::backup::{export_backup, import_backup, SECTION_SEPARATOR};
use diary_insight_mcp::tools::{self, ExportParams, ImportParams, UpdateSettingsParams, WriteEntryParams};
use diary_insight_mcp::*;
use serde_json::json;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
}

async fn seeded(path: std::path::PathBuf) -> SqliteStorage {
    let storage = SqliteStorage::new(path).expect("Failed to create storage");
    for (date, content) in [
        ("2025-06-01", "산책을 하고 음악을 들었다"),
        ("2025-06-02", "Long day at work"),
        ("2025-06-03", "가족과 함께 저녁"),
    ] {
        let params = WriteEntryParams {
            content: content.to_string(),
            date: Some(date.to_string()),
            weather: Some("clear".to_string()),
            ..WriteEntryParams::default()
        };
        tools::write_entry(&storage, None, params, today()).await.unwrap();
    }
    let settings = UpdateSettingsParams {
        personality: Some("neutral_observer".to_string()),
        ..UpdateSettingsParams::default()
    };
    tools::update_settings(&storage, settings, today()).unwrap();
    storage
}

#[tokio::test]
async fn test_json_backup_restores_into_a_fresh_database() {
    let dir = TempDir::new().unwrap();
    let source = seeded(dir.path().join("source.db")).await;
    let backup_file = dir.path().join("backup.json");

    let exported = tools::export_diary(
        &source,
        ExportParams {
            format: Some("json".to_string()),
            path: Some(backup_file.to_string_lossy().to_string()),
        },
        today(),
    )
    .unwrap();
    assert_eq!(exported.entry_count, 3);

    let target = SqliteStorage::new(dir.path().join("target.db")).unwrap();
    let imported = tools::import_diary(
        &target,
        ImportParams {
            data: None,
            path: Some(backup_file.to_string_lossy().to_string()),
        },
    )
    .unwrap();
    assert!(imported.success);

    assert_eq!(target.list_entries().unwrap(), source.list_entries().unwrap());
    assert_eq!(
        target.load_settings().unwrap().personality,
        Personality::NeutralObserver
    );
}

#[tokio::test]
async fn test_invalid_backup_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let storage = seeded(dir.path().join("diary.db")).await;
    let before = storage.list_entries().unwrap();

    assert!(!import_backup(&storage, &json!({"version": 1})));
    assert!(!import_backup(&storage, &json!({"diaries": {"not": "an array"}})));

    let mut document = serde_json::to_value(export_backup(&storage).unwrap()).unwrap();
    document["diaries"][1]["date"] = json!("June second");
    assert!(!import_backup(&storage, &document));

    assert_eq!(storage.list_entries().unwrap(), before);
}

#[tokio::test]
async fn test_markdown_export_sections() {
    let dir = TempDir::new().unwrap();
    let storage = seeded(dir.path().join("diary.db")).await;

    let exported = tools::export_diary(
        &storage,
        ExportParams {
            format: Some("markdown".to_string()),
            path: None,
        },
        today(),
    )
    .unwrap();

    let (header, body) = exported
        .document
        .split_once("\n---\n\n")
        .expect("header separator");
    assert!(header.starts_with("# Diary Backup (2025-06-20)"));
    assert!(header.contains("3 entries included."));

    let sections: Vec<&str> = body.split(SECTION_SEPARATOR).collect();
    assert_eq!(sections.len(), 3);
    assert!(sections[0].starts_with("# Diary: 2025-06-01"));
    for section in &sections {
        assert_eq!(section.matches("/5\n").count(), Metric::ALL.len());
    }
}
