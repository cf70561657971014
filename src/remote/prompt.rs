/// Prompt construction and response parsing for remote analysis

use serde_json::Value;

use crate::analyzer::AnalysisInput;
use crate::domain::{
    lenient_number, Analysis, EmotionalScore, Metric, MetricScores, Personality, METRIC_MAX, METRIC_MIN,
};
use crate::remote::ProviderError;

/// Rating used for a metric the provider left out
pub const MISSING_METRIC_SCORE: u8 = 3;

/// Prompt sent by the connection test
pub const CONNECTION_TEST_PROMPT: &str =
    "Hello! This is a connection check. Reply with one sentence saying 'Connection successful'.";

fn personality_instruction(personality: Personality) -> &'static str {
    match personality {
        Personality::WarmCompanion => {
            "You are a 'warm companion': a kind, deeply empathetic friend. Understand the writer's \
             feelings and offer comfort and encouragement."
        }
        Personality::GrowthCoach => {
            "You are a 'growth coach' who helps the writer improve. Find what can be learned from \
             today and give motivation and concrete advice for a better tomorrow."
        }
        Personality::NeutralObserver => {
            "You are a calm, objective 'neutral observer'. Leave emotion aside and analyze the day \
             from facts and data, offering logical insights."
        }
    }
}

/// Build the analysis prompt for one entry
pub fn build_prompt(input: &AnalysisInput) -> String {
    let mut extra = Vec::new();
    if let Some(weather) = input.weather {
        extra.push(format!("- Weather: {}", weather.key()));
    }
    if let Some(hours) = input.sleep_hours {
        extra.push(format!("- Sleep: {} hours", hours));
    }

    format!(
        r#"As a diary analysis expert, analyze the following diary and answer only in the JSON format below.

[Diary start]
{content}
[Diary end]

[Additional data]
{extra}

[Instructions]
1. Personality: {personality}
2. Infer how the additional data (weather, sleep) affected the writer's condition, activities and emotions, and mention it naturally in the feedback.
3. The response must be JSON only, with no other text.
4. JSON structure:
{{
  "summary": "one-sentence summary of the diary",
  "emotionalScore": {{ "positive": 0-100, "negative": 0-100, "neutral": 0-100 }},
  "metricScores": {{ "health": 1-5, "money": 1-5, "relationship": 1-5, "growth": 1-5, "rest": 1-5, "hobby": 1-5, "work": 1-5 }},
  "feedback": "2-3 sentences of feedback in the chosen personality"
}}

[Notes]
- Every score must be a number.
- The feedback must reflect the chosen personality.
- Write the summary and feedback in the same language as the diary."#,
        content = input.content,
        extra = extra.join("\n"),
        personality = personality_instruction(input.personality),
    )
}

/// Slice from the first `{` to the last `}`
fn json_object_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn required_text(object: &Value, key: &str) -> Result<String, ProviderError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("missing '{}'", key)))
}

/// Parse and normalise a provider response into an Analysis
///
/// Emotion components are clamped into [0, 100] and metric ratings into
/// [1, 5]; metrics the provider left out are set to 3. A response without a
/// JSON object, or without summary/feedback text, is malformed.
pub fn parse_response(text: &str) -> Result<Analysis, ProviderError> {
    let slice = json_object_slice(text)
        .ok_or_else(|| ProviderError::MalformedResponse("no JSON object in response".to_string()))?;
    let object: Value = serde_json::from_str(slice)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    let summary = required_text(&object, "summary")?;
    let feedback = required_text(&object, "feedback")?;

    let emotion = object.get("emotionalScore");
    let component = |key: &str| -> i64 {
        emotion
            .and_then(|e| e.get(key))
            .and_then(lenient_number)
            .map(|v| v.round() as i64)
            .unwrap_or(0)
    };
    let emotional_score = EmotionalScore::clamped(component("positive"), component("negative"), component("neutral"));

    let mut metric_scores = MetricScores::uniform(MISSING_METRIC_SCORE);
    if let Some(Value::Object(scores)) = object.get("metricScores") {
        for (key, value) in scores {
            let (Ok(metric), Some(score)) = (key.parse::<Metric>(), lenient_number(value)) else {
                continue;
            };
            let score = score.round().clamp(METRIC_MIN as f64, METRIC_MAX as f64) as u8;
            metric_scores.set(metric, score);
        }
    }

    Ok(Analysis {
        summary,
        emotional_score,
        metric_scores,
        feedback,
        debug: None,
    })
}
