/// Rule-based diary analyzer
///
/// This module turns entry text and its metadata into a complete Analysis
/// without any network access. It is used directly when no remote provider is
/// available and as the fallback whenever a remote analysis fails.

pub mod categorizer;
pub mod emotion;
pub mod feedback;
pub mod lexicon;
pub mod metrics;

pub use categorizer::CategoryCounts;
pub use feedback::TemplateKey;

use crate::domain::{Analysis, DiaryEntry, EntryDraft, Personality, Weather};

/// Everything the analyzers look at for one entry
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub content: String,
    pub weather: Option<Weather>,
    pub sleep_hours: Option<f64>,
    pub personality: Personality,
}

impl AnalysisInput {
    /// Build the input from a draft, falling back to the settings tone
    pub fn from_draft(draft: &EntryDraft, default_personality: Personality) -> Self {
        Self {
            content: draft.content.clone(),
            weather: draft.weather,
            sleep_hours: draft.resolved_sleep_hours(),
            personality: draft.personality.unwrap_or(default_personality),
        }
    }

    /// Build the input from a stored entry
    pub fn from_entry(entry: &DiaryEntry) -> Self {
        Self {
            content: entry.content.clone(),
            weather: entry.weather,
            sleep_hours: entry.resolved_sleep_hours(),
            personality: entry.personality,
        }
    }
}

/// Deterministic keyword analyzer
///
/// Categorizes the text, scores emotion and metrics in parallel from the
/// same counts, then picks summary and feedback templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalyzer;

impl LocalAnalyzer {
    /// Create a new local analyzer
    pub fn new() -> Self {
        Self
    }

    /// Produce a complete analysis for one entry
    pub fn analyze(&self, input: &AnalysisInput) -> Analysis {
        let counts = CategoryCounts::from_text(&input.content);
        let emotional_score = emotion::score_emotion(&input.content);
        let metric_scores = metrics::score_metrics(&counts, &emotional_score);

        let dominant = counts.dominant();
        let summary = feedback::template(feedback::summary_key(dominant, &emotional_score)).to_string();
        let context = feedback::context_keys(input.weather, input.sleep_hours);
        let feedback = feedback::compose_feedback(dominant, &emotional_score, &context, input.personality);

        tracing::debug!(
            "Local analysis: dominant={:?} positive={} negative={}",
            dominant, emotional_score.positive, emotional_score.negative
        );

        Analysis {
            summary,
            emotional_score,
            metric_scores,
            feedback,
            debug: None,
        }
    }
}
