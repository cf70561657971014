/// Per-metric ratings derived from keyword counts

use crate::analyzer::categorizer::CategoryCounts;
use crate::domain::{EmotionalScore, LifeCategory, Metric, MetricScores, METRIC_MAX};

/// Starting rating for every metric, driven by the positive emotion score
pub fn base_score(emotion: &EmotionalScore) -> u8 {
    if emotion.positive > 60 {
        4
    } else if emotion.positive > 40 {
        3
    } else {
        2
    }
}

/// Rate all seven metrics for one entry
///
/// Health and finance get a bonus that grows with the number of keyword hits;
/// relationship, hobby, growth and work get a flat +1 when mentioned (growth
/// and work both follow the work keyword count). Rest is never derived from
/// text and always equals the base score.
pub fn score_metrics(counts: &CategoryCounts, emotion: &EmotionalScore) -> MetricScores {
    let base = base_score(emotion);

    let scaled = |count: u32| -> u8 {
        if count > 0 {
            (base as u32 + 1 + count / 2).min(METRIC_MAX as u32) as u8
        } else {
            base
        }
    };
    let flat = |count: u32| -> u8 {
        if count > 0 {
            (base + 1).min(METRIC_MAX)
        } else {
            base
        }
    };

    let work = counts.get(LifeCategory::Work);

    let mut scores = MetricScores::default();
    scores.set(Metric::Health, scaled(counts.get(LifeCategory::Health)));
    scores.set(Metric::Money, scaled(counts.get(LifeCategory::Finance)));
    scores.set(Metric::Relationship, flat(counts.get(LifeCategory::Relationship)));
    scores.set(Metric::Growth, flat(work));
    // TODO: derive rest from sleep keywords once a rest lexicon is agreed on
    scores.set(Metric::Rest, base);
    scores.set(Metric::Hobby, flat(counts.get(LifeCategory::Hobby)));
    scores.set(Metric::Work, flat(work));
    scores
}
