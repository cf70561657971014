/// Weighted score, period buckets and chart sampling
use chrono::NaiveDate;
use diary_insight_mcp::analytics::period::{navigate, period_label, stride_sample, DateRange};
use diary_insight_mcp::analytics::weighted_score_of;
use diary_insight_mcp::*;
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry_on(day: NaiveDate, scores: MetricScores) -> DiaryEntry {
    let draft = EntryDraft {
        date: Some(day),
        ..EntryDraft::with_content("entry")
    };
    let analysis = Analysis {
        summary: "summary".to_string(),
        emotional_score: EmotionalScore::default(),
        metric_scores: scores,
        feedback: "feedback".to_string(),
        debug: None,
    };
    DiaryEntry::from_draft(draft, Personality::default(), analysis).unwrap()
}

#[test]
fn test_uniform_scores_give_that_score() {
    for score in 1..=5u8 {
        let scores = MetricScores::uniform(score);
        assert_eq!(weighted_score_of(&scores, &default_weights()), score as f64);
    }
}

#[test]
fn test_weighted_score_edge_cases() {
    let mut scores = MetricScores::default();
    scores.set(Metric::Health, 5);
    scores.set(Metric::Money, 1);

    let even: Weights = BTreeMap::from([(Metric::Health, 50), (Metric::Money, 50)]);
    assert_eq!(weighted_score_of(&scores, &even), 3.0);

    // unscored metrics do not dilute the result
    let with_unscored: Weights = BTreeMap::from([(Metric::Health, 50), (Metric::Work, 50)]);
    assert_eq!(weighted_score_of(&scores, &with_unscored), 5.0);

    assert_eq!(weighted_score_of(&scores, &Weights::new()), 0.0);
    assert_eq!(AnalyticsEngine::new().weighted_score(None, &default_weights()), 0.0);
}

#[test]
fn test_week_bucket_of_a_wednesday() {
    let range = DateRange::containing(date(2025, 6, 11), PeriodKind::Week);
    assert_eq!(range.start, date(2025, 6, 9));
    assert_eq!(range.end, date(2025, 6, 15));
    assert_eq!(period_label(date(2025, 6, 11), PeriodKind::Week), "2025 Jun, week 2");
    assert_eq!(navigate(date(2025, 1, 31), PeriodKind::Month, 1), date(2025, 2, 28));
}

#[test]
fn test_stride_sampling() {
    let forty: Vec<u32> = (0..40).collect();
    let sampled = stride_sample(&forty, 20);
    assert_eq!(sampled.len(), 20);
    assert_eq!(sampled.first(), Some(&0));
    assert_eq!(sampled.last(), Some(&38));

    let five: Vec<u32> = (0..5).collect();
    assert_eq!(stride_sample(&five, 7), five);
}

#[test]
fn test_review_of_a_week() {
    let mut high = MetricScores::uniform(3);
    high.set(Metric::Health, 5);
    let mut low = MetricScores::uniform(3);
    low.set(Metric::Rest, 1);

    let entries = vec![
        entry_on(date(2025, 6, 9), high),
        entry_on(date(2025, 6, 12), low),
        entry_on(date(2025, 6, 16), MetricScores::uniform(5)),
    ];

    let review = AnalyticsEngine::new().review(&entries, date(2025, 6, 11), PeriodKind::Week);
    assert_eq!(review.entry_count, 2);
    assert_eq!(review.iso_week, Some(24));
    assert_eq!(review.averages.get(&Metric::Health), Some(&4.0));
    assert_eq!(review.averages.get(&Metric::Rest), Some(&2.0));

    let insight = review.insight.expect("insight for a non-empty period");
    assert_eq!(insight.highest, Metric::Health);
    assert_eq!(insight.lowest, Metric::Rest);
    assert!(insight.tip.is_some());

    let labels: Vec<&str> = review.chart.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["06/09", "06/12"]);
}

#[test]
fn test_empty_period() {
    let review = AnalyticsEngine::new().review(&[], date(2025, 6, 11), PeriodKind::Month);
    assert_eq!(review.entry_count, 0);
    assert!(review.averages.is_empty());
    assert!(review.insight.is_none());
    assert!(review.chart.is_empty());
    assert_eq!(review.emotions.total(), 0);
}
