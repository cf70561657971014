/// Emotion scoring from positive/negative keyword presence

use crate::analyzer::lexicon;
use crate::domain::EmotionalScore;

/// Points added for each distinct emotion keyword found
pub const KEYWORD_INCREMENT: i64 = 8;

/// Score the positive and negative polarity of `text`
///
/// Each keyword present adds a fixed increment. Both components are clamped
/// into [0, 100]; `neutral` is always 0 for the rule-based analyzer.
pub fn score_emotion(text: &str) -> EmotionalScore {
    let positive = lexicon::count_present(text, lexicon::POSITIVE) as i64 * KEYWORD_INCREMENT;
    let negative = lexicon::count_present(text, lexicon::NEGATIVE) as i64 * KEYWORD_INCREMENT;

    EmotionalScore::clamped(positive, negative.max(0), 0)
}
