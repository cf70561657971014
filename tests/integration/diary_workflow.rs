/// End-to-end diary workflows against an on-disk database
use async_trait::async_trait;
use chrono::NaiveDate;
use diary_insight_mcp::tools::{self, ListEntriesParams, ReviewParams, UpdateSettingsParams, WriteEntryParams};
use diary_insight_mcp::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const REMOTE_REPLY: &str = r#"Here you go:
{"summary": "A calm and productive day", "emotionalScore": {"positive": 75, "negative": 5, "neutral": 20},
 "metricScores": {"health": 4, "money": 3, "relationship": 5, "growth": 4, "rest": 9, "hobby": 3},
 "feedback": "Keep it up"}"#;

/// Provider that answers every prompt with the same reply
struct CannedProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl AnalysisProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _model: &str, _api_key: &str, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(REMOTE_REPLY.to_string())
    }
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn params(date: &str, content: &str) -> WriteEntryParams {
    WriteEntryParams {
        content: content.to_string(),
        date: Some(date.to_string()),
        ..WriteEntryParams::default()
    }
}

#[tokio::test]
async fn test_entries_survive_reopening_the_database() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("diary.db");

    let server = DiaryServer::new(db_path.clone(), true)
        .await
        .expect("Failed to create server");
    assert!(server.provider().is_none());

    let written = tools::write_entry(server.storage(), server.provider(), params("2025-06-10", "오늘 운동을 해서 행복했다"), june(10))
        .await
        .unwrap();
    assert_eq!(written.origin, AnalysisOrigin::Local);
    drop(server);

    let reopened = SqliteStorage::new(db_path).expect("Failed to reopen storage");
    let entries = reopened.list_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, written.entry.id);
    assert_eq!(entries[0].analysis, written.entry.analysis);
}

#[tokio::test]
async fn test_remote_analysis_and_free_plan_limit() {
    let storage = SqliteStorage::in_memory().unwrap();
    let provider = CannedProvider { calls: AtomicUsize::new(0) };
    let server = DiaryServer::with_storage(storage, Some(Box::new(provider)));

    // without a key everything stays local
    let local = tools::write_entry(server.storage(), server.provider(), params("2025-06-11", "day one"), june(11))
        .await
        .unwrap();
    assert_eq!(local.origin, AnalysisOrigin::Local);

    let key = UpdateSettingsParams {
        api_key: Some("test-key".to_string()),
        debug: Some(true),
        ..UpdateSettingsParams::default()
    };
    tools::update_settings(server.storage(), key, june(11)).unwrap();

    let remote = tools::write_entry(server.storage(), server.provider(), params("2025-06-11", "day two"), june(11))
        .await
        .unwrap();
    assert_eq!(remote.origin, AnalysisOrigin::Remote);
    assert_eq!(remote.entry.analysis.summary, "A calm and productive day");
    assert_eq!(remote.entry.analysis.metric_scores.get(Metric::Rest), Some(5));
    assert_eq!(remote.entry.analysis.metric_scores.get(Metric::Work), Some(3));
    assert!(remote.entry.analysis.debug.is_some());

    for _ in 1..FREE_DAILY_REMOTE_LIMIT {
        let response = tools::write_entry(server.storage(), server.provider(), params("2025-06-11", "more"), june(11))
            .await
            .unwrap();
        assert_eq!(response.origin, AnalysisOrigin::Remote);
    }

    let limited = tools::write_entry(server.storage(), server.provider(), params("2025-06-11", "one too many"), june(11))
        .await
        .unwrap();
    assert_eq!(limited.origin, AnalysisOrigin::UsageLimited);

    let settings = server.storage().load_settings().unwrap();
    assert_eq!(settings.usage.used_on(june(11)), FREE_DAILY_REMOTE_LIMIT);

    // the next day starts over
    let next_day = tools::write_entry(server.storage(), server.provider(), params("2025-06-12", "fresh"), june(12))
        .await
        .unwrap();
    assert_eq!(next_day.origin, AnalysisOrigin::Remote);
}

#[tokio::test]
async fn test_write_list_review_dashboard() {
    let storage = SqliteStorage::in_memory().unwrap();
    let server = DiaryServer::with_storage(storage, None);

    for (date, content) in [
        ("2025-06-09", "친구와 저녁을 먹어서 즐거웠다"),
        ("2025-06-11", "회사 업무가 많아서 힘들었다"),
        ("2025-06-15", "주식 투자 수익"),
        ("2025-06-16", "next week"),
    ] {
        tools::write_entry(server.storage(), None, params(date, content), june(16))
            .await
            .unwrap();
    }

    let listed = tools::list_entries(
        server.storage(),
        ListEntriesParams {
            month: Some("2025-06".to_string()),
            ..ListEntriesParams::default()
        },
    )
    .unwrap();
    assert_eq!(listed.total_matches, 4);
    assert_eq!(listed.entries[0].date, "2025-06-16");

    let review = tools::review_period(
        server.storage(),
        server.analytics(),
        ReviewParams {
            date: Some("2025-06-11".to_string()),
            ..ReviewParams::default()
        },
        june(16),
    )
    .unwrap();
    assert_eq!(review.review.entry_count, 3);
    assert_eq!(review.review.range.start, june(9));
    assert_eq!(review.review.range.end, june(15));
    assert_eq!(review.review.emotions.total(), 3);
    assert_eq!(review.review.chart.len(), 3);
    assert_eq!(review.review.chart[0].label, "06/09");

    let weights = server.storage().load_settings().unwrap().weights;
    let entries = server.storage().list_entries().unwrap();
    let dashboard = server.analytics().dashboard(&entries, &weights, june(16));
    assert!(dashboard.wrote_today);
    assert_eq!(dashboard.total_entries, 4);
    assert_eq!(
        dashboard.latest_weighted_score,
        server.analytics().weighted_score(entries.first(), &weights)
    );
}
