/// Analytics engine for weighted scores, period reviews and the dashboard
///
/// Everything here is a pure function of stored entries and the current
/// settings; nothing is cached or persisted.

pub mod listing;
pub mod period;
pub mod stats;

pub use listing::{ListQuery, SortOrder};
pub use period::{ChartPoint, DateRange, PeriodKind};
pub use stats::{EmotionBucket, EmotionDistribution, PeriodInsight};

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use crate::domain::{DiaryEntry, Metric, MetricScores, Weights};

/// Composite 0-5 score of a set of metric ratings under `weights`
///
/// Only metrics that are both weighted and scored contribute. Returns 0 when
/// the contributing weight is 0.
pub fn weighted_score_of(scores: &MetricScores, weights: &Weights) -> f64 {
    let (total, weight_sum) = weights
        .iter()
        .filter_map(|(metric, weight)| scores.get(*metric).map(|s| (s as u64, *weight as u64)))
        .fold((0u64, 0u64), |(total, sum), (score, weight)| {
            (total + score * weight, sum + weight)
        });

    if weight_sum == 0 {
        return 0.0;
    }
    stats::round1(total as f64 / weight_sum as f64)
}

/// Weighted score of an entry, 0 when there is no entry
pub fn weighted_score(entry: Option<&DiaryEntry>, weights: &Weights) -> f64 {
    entry.map_or(0.0, |e| weighted_score_of(&e.analysis.metric_scores, weights))
}

/// Statistics for one week, month or year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReview {
    pub kind: PeriodKind,
    pub label: String,
    pub range: DateRange,
    /// ISO week number, for weekly reviews
    pub iso_week: Option<u32>,
    pub entry_count: usize,
    pub averages: BTreeMap<Metric, f64>,
    pub insight: Option<PeriodInsight>,
    pub emotions: EmotionDistribution,
    pub chart: Vec<ChartPoint>,
}

/// Snapshot shown on the home screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_entries: usize,
    pub latest: Option<DiaryEntry>,
    pub latest_weighted_score: f64,
    pub wrote_today: bool,
    /// Days among the last 7 (today included) that have an entry
    pub days_written_last_week: usize,
}

/// Analytics engine over stored diary entries
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    pub fn weighted_score(&self, entry: Option<&DiaryEntry>, weights: &Weights) -> f64 {
        weighted_score(entry, weights)
    }

    /// Review the period of `kind` containing `reference`
    pub fn review(&self, entries: &[DiaryEntry], reference: NaiveDate, kind: PeriodKind) -> PeriodReview {
        let range = DateRange::containing(reference, kind);
        let in_period = period::entries_in_range(entries, &range);
        let averages = stats::average_scores(&in_period);

        tracing::debug!("Reviewing {:?} {} with {} entries", kind, range, in_period.len());

        PeriodReview {
            kind,
            label: period::period_label(reference, kind),
            range,
            iso_week: (kind == PeriodKind::Week).then(|| period::iso_week_number(reference)),
            entry_count: in_period.len(),
            insight: stats::period_insight(&averages),
            averages,
            emotions: EmotionDistribution::from_entries(&in_period),
            chart: period::chart_points(&in_period, kind),
        }
    }

    /// Home screen summary as of `today`
    pub fn dashboard(&self, entries: &[DiaryEntry], weights: &Weights, today: NaiveDate) -> DashboardSummary {
        let latest = entries
            .iter()
            .max_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)))
            .cloned();

        let week_start = today - Duration::days(6);
        let mut days: Vec<NaiveDate> = entries
            .iter()
            .map(|e| e.date)
            .filter(|d| *d >= week_start && *d <= today)
            .collect();
        days.sort();
        days.dedup();

        DashboardSummary {
            total_entries: entries.len(),
            latest_weighted_score: weighted_score(latest.as_ref(), weights),
            latest,
            wrote_today: entries.iter().any(|e| e.date == today),
            days_written_last_week: days.len(),
        }
    }
}
