/// Analysis attached to every diary entry
///
/// An Analysis is owned by exactly one DiaryEntry and is always replaced as a
/// whole when the entry is written or edited.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::domain::Metric;

/// Lowest and highest valid metric rating
pub const METRIC_MIN: u8 = 1;
pub const METRIC_MAX: u8 = 5;

/// Upper bound of every emotion component
pub const EMOTION_MAX: u8 = 100;

/// A number, or a string holding one
///
/// Scores written by LLMs and by older clients are not always integers.
pub fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn score_component<E: serde::de::Error>(key: &str, value: &Value) -> Result<i64, E> {
    match value {
        Value::Null => Ok(0),
        other => lenient_number(other)
            .map(|v| v.round() as i64)
            .ok_or_else(|| E::custom(format!("'{}' is not a number: {}", key, other))),
    }
}

/// Emotion percentages derived from an entry
///
/// Deserializing clamps each component into [0, 100] and accepts fractional
/// or string-encoded numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmotionalScore {
    pub positive: u8,
    pub negative: u8,
    pub neutral: u8,
}

impl EmotionalScore {
    /// Build a score from raw (possibly out-of-range) values, clamping each
    /// component into [0, 100]
    pub fn clamped(positive: i64, negative: i64, neutral: i64) -> Self {
        let clamp = |v: i64| v.clamp(0, EMOTION_MAX as i64) as u8;
        Self {
            positive: clamp(positive),
            negative: clamp(negative),
            neutral: clamp(neutral),
        }
    }

    /// Positive minus negative, the axis the feedback ladder works on
    pub fn balance(&self) -> i32 {
        self.positive as i32 - self.negative as i32
    }
}

impl<'de> Deserialize<'de> for EmotionalScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            positive: Value,
            #[serde(default)]
            negative: Value,
            #[serde(default)]
            neutral: Value,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::clamped(
            score_component("positive", &raw.positive)?,
            score_component("negative", &raw.negative)?,
            score_component("neutral", &raw.neutral)?,
        ))
    }
}

/// Ratings (1-5) for each metric
///
/// Stored as a map so that documents produced by other clients with missing
/// keys still load; consumers treat a missing metric as unscored. Ratings are
/// rounded and clamped into [1, 5] when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MetricScores(pub BTreeMap<Metric, u8>);

impl MetricScores {
    /// Every metric set to the same rating
    pub fn uniform(score: u8) -> Self {
        Self(Metric::ALL.iter().map(|m| (*m, score.clamp(METRIC_MIN, METRIC_MAX))).collect())
    }

    pub fn get(&self, metric: Metric) -> Option<u8> {
        self.0.get(&metric).copied()
    }

    /// Set a rating, clamped into [1, 5]
    pub fn set(&mut self, metric: Metric, score: u8) {
        self.0.insert(metric, score.clamp(METRIC_MIN, METRIC_MAX));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, u8)> + '_ {
        self.0.iter().map(|(m, s)| (*m, *s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MetricScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<Metric, Value>::deserialize(deserializer)?;

        let mut scores = MetricScores::default();
        for (metric, value) in raw {
            if value.is_null() {
                continue;
            }
            let score = lenient_number(&value).ok_or_else(|| {
                D::Error::custom(format!("score for '{}' is not a number: {}", metric.key(), value))
            })?;
            scores.set(metric, score.round().clamp(METRIC_MIN as f64, METRIC_MAX as f64) as u8);
        }
        Ok(scores)
    }
}

/// Prompt and raw provider output kept when debug mode is on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDebug {
    pub prompt: String,
    pub raw_response: String,
}

/// The full analysis of one diary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// One-sentence summary of the day
    pub summary: String,
    /// Emotion percentages
    pub emotional_score: EmotionalScore,
    /// Per-metric ratings
    #[serde(default)]
    pub metric_scores: MetricScores,
    /// Tone-dependent feedback text
    pub feedback: String,
    /// Present only for remote analyses produced in debug mode
    #[serde(rename = "_debug", default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<AnalysisDebug>,
}
