/// Per-period statistics: averages, insight and emotion distribution

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use crate::domain::{DiaryEntry, EmotionalScore, Metric};

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean rating per metric over `entries`, to one decimal
///
/// A metric missing from an entry counts as 0 for that entry. Returns an
/// empty map when there are no entries.
pub fn average_scores(entries: &[&DiaryEntry]) -> BTreeMap<Metric, f64> {
    if entries.is_empty() {
        return BTreeMap::new();
    }

    let n = entries.len() as f64;
    Metric::ALL
        .iter()
        .map(|metric| {
            let sum: u32 = entries
                .iter()
                .map(|e| e.analysis.metric_scores.get(*metric).unwrap_or(0) as u32)
                .sum();
            (*metric, round1(sum as f64 / n))
        })
        .collect()
}

/// Strongest and weakest metric of a period, with an optional tip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInsight {
    pub highest: Metric,
    pub highest_score: f64,
    pub lowest: Metric,
    pub lowest_score: f64,
    pub message: String,
    pub tip: Option<&'static str>,
}

/// Advice for a metric that came out lowest
///
/// Only rest, health, relationship and hobby have one.
pub fn improvement_tip(metric: Metric) -> Option<&'static str> {
    match metric {
        Metric::Rest => Some("Try going to bed a little earlier to get enough sleep."),
        Metric::Health => Some("A short walk or some light exercise could lift your energy."),
        Metric::Relationship => Some("How about reaching out to someone you have not talked to in a while?"),
        Metric::Hobby => Some("Make some time for a hobby you enjoy to relieve stress."),
        Metric::Money | Metric::Growth | Metric::Work => None,
    }
}

/// Highest and lowest metric from period averages
///
/// Metrics are sorted by average, descending, with a stable sort over the
/// declaration order: ties for highest go to the first declared metric, ties
/// for lowest to the last declared one.
pub fn period_insight(averages: &BTreeMap<Metric, f64>) -> Option<PeriodInsight> {
    let mut ranked: Vec<(Metric, f64)> = averages.iter().map(|(m, v)| (*m, *v)).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let (highest, highest_score) = *ranked.first()?;
    let (lowest, lowest_score) = *ranked.last()?;
    let tip = improvement_tip(lowest);

    let mut message = format!(
        "{} {} was your strongest area this period ({:.1}), while {} {} needs the most care ({:.1}).",
        highest.icon(), highest.display_name(), highest_score,
        lowest.icon(), lowest.display_name(), lowest_score
    );
    if let Some(tip) = tip {
        message.push(' ');
        message.push_str(tip);
    }

    Some(PeriodInsight {
        highest,
        highest_score,
        lowest,
        lowest_score,
        message,
        tip,
    })
}

/// Coarse mood bucket of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionBucket {
    Happy,
    Good,
    Sad,
    Neutral,
}

impl EmotionBucket {
    pub fn classify(score: &EmotionalScore) -> Self {
        if score.positive >= 70 {
            EmotionBucket::Happy
        } else if score.positive >= 50 {
            EmotionBucket::Good
        } else if score.negative >= 40 {
            EmotionBucket::Sad
        } else {
            EmotionBucket::Neutral
        }
    }
}

/// Count of entries per mood bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmotionDistribution {
    pub happy: usize,
    pub good: usize,
    pub sad: usize,
    pub neutral: usize,
}

impl EmotionDistribution {
    pub fn from_entries(entries: &[&DiaryEntry]) -> Self {
        let mut dist = Self::default();
        for entry in entries {
            match EmotionBucket::classify(&entry.analysis.emotional_score) {
                EmotionBucket::Happy => dist.happy += 1,
                EmotionBucket::Good => dist.good += 1,
                EmotionBucket::Sad => dist.sad += 1,
                EmotionBucket::Neutral => dist.neutral += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.happy + self.good + self.sad + self.neutral
    }
}
