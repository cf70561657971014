/// User settings record
///
/// There is exactly one Settings record per device. It is loaded from storage
/// and passed explicitly into the analyzer and aggregators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{DomainError, Metric, Personality, Plan};

/// Largest weight the settings screen allows for a single metric
pub const MAX_WEIGHT: u32 = 50;

/// Model used for remote analysis when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Remote analyses a free plan may run per day
pub const FREE_DAILY_REMOTE_LIMIT: u32 = 5;

/// Per-metric percentage weights used by the weighted score
pub type Weights = BTreeMap<Metric, u32>;

/// Default weights shipped with a fresh install (sum to 100)
pub fn default_weights() -> Weights {
    BTreeMap::from([
        (Metric::Health, 20),
        (Metric::Money, 10),
        (Metric::Relationship, 20),
        (Metric::Growth, 15),
        (Metric::Rest, 15),
        (Metric::Hobby, 10),
        (Metric::Work, 10),
    ])
}

/// Remote analysis usage for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounter {
    pub day: Option<NaiveDate>,
    pub remote_analyses: u32,
}

impl UsageCounter {
    /// Number of remote analyses already run on `today`
    pub fn used_on(&self, today: NaiveDate) -> u32 {
        if self.day == Some(today) {
            self.remote_analyses
        } else {
            0
        }
    }

    /// Record one remote analysis on `today`, resetting on a new day
    pub fn record(&mut self, today: NaiveDate) {
        self.remote_analyses = self.used_on(today) + 1;
        self.day = Some(today);
    }
}

/// Global, per-device settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub personality: Personality,
    #[serde(default = "default_weights")]
    pub weights: Weights,
    #[serde(default)]
    pub plan: Plan,
    /// Lifts the free plan limit (developer/testing override)
    #[serde(default)]
    pub unlimited_usage: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Keep prompt and raw response on remote analyses
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub usage: UsageCounter,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            personality: Personality::default(),
            weights: default_weights(),
            plan: Plan::default(),
            unlimited_usage: false,
            api_key: None,
            model: default_model(),
            debug: false,
            usage: UsageCounter::default(),
        }
    }
}

impl Settings {
    /// Sum of all weights; 100 is recommended but not enforced
    pub fn total_weight(&self) -> u32 {
        self.weights.values().sum()
    }

    /// The API key, if one is configured and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Whether the free plan limit blocks another remote analysis today
    pub fn remote_limit_reached(&self, today: NaiveDate) -> bool {
        self.plan == Plan::Free
            && !self.unlimited_usage
            && self.usage.used_on(today) >= FREE_DAILY_REMOTE_LIMIT
    }

    /// Replace weights after checking each is within 0..=50
    pub fn set_weights(&mut self, weights: Weights) -> Result<(), DomainError> {
        for (metric, weight) in &weights {
            if *weight > MAX_WEIGHT {
                return Err(DomainError::InvalidValue {
                    message: format!(
                        "Weight for {} must be between 0 and {}, got {}",
                        metric.key(), MAX_WEIGHT, weight
                    ),
                });
            }
        }
        if weights.values().sum::<u32>() != 100 {
            tracing::debug!("Weights sum to {} (100 recommended)", weights.values().sum::<u32>());
        }
        self.weights = weights;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        let settings = Settings::default();
        assert_eq!(settings.total_weight(), 100);
        assert_eq!(settings.personality, Personality::WarmCompanion);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_weight_above_cap_is_rejected() {
        let mut settings = Settings::default();
        let mut weights = default_weights();
        weights.insert(Metric::Rest, 51);

        assert!(settings.set_weights(weights).is_err());
        assert_eq!(settings.weights, default_weights());
    }

    #[test]
    fn test_free_plan_limit() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let mut settings = Settings::default();

        for _ in 0..FREE_DAILY_REMOTE_LIMIT {
            assert!(!settings.remote_limit_reached(today));
            settings.usage.record(today);
        }
        assert!(settings.remote_limit_reached(today));

        // A new day resets the counter
        let tomorrow = today.succ_opt().unwrap();
        assert!(!settings.remote_limit_reached(tomorrow));

        // The override and the pro plan both lift the limit
        settings.unlimited_usage = true;
        assert!(!settings.remote_limit_reached(today));
        settings.unlimited_usage = false;
        settings.plan = Plan::Pro;
        assert!(!settings.remote_limit_reached(today));
    }

    #[test]
    fn test_partial_settings_document_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"personality":"growth_coach","weights":{"health":50}}"#).unwrap();
        assert_eq!(settings.personality, Personality::GrowthCoach);
        assert_eq!(settings.weights.len(), 1);
        assert_eq!(settings.plan, Plan::Free);
        assert!(settings.credential().is_none());
    }
}
