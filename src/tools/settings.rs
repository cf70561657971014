/// Tools for reading and updating settings
///
/// This module implements the settings_get and settings_update MCP tools.
/// Updates are merged field by field over the stored record.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Metric, Personality, Plan, Settings, Weights, FREE_DAILY_REMOTE_LIMIT};
use crate::storage::DiaryStorage;
use crate::tools::{parse_tag, ToolError};

/// settings_get takes no parameters
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetSettingsParams {}

/// Fields to change; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateSettingsParams {
    /// warm_companion, growth_coach or neutral_observer
    pub personality: Option<String>,
    /// Metric weights (0-50 each, 100 in total recommended); replaces all weights
    pub weights: Option<BTreeMap<String, u32>>,
    /// free or pro
    pub plan: Option<String>,
    /// Lift the free plan daily limit
    pub unlimited_usage: Option<bool>,
    /// Gemini API key; an empty string removes it
    pub api_key: Option<String>,
    /// Model name, e.g. gemini-2.0-flash
    pub model: Option<String>,
    /// Keep prompt and raw response on AI analyses
    pub debug: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    pub message: String,
}

/// Show an API key with everything but the last four characters hidden
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn format_settings(settings: &Settings, today: NaiveDate) -> String {
    let weights = Metric::ALL
        .iter()
        .map(|m| format!("- {} {}: {}", m.icon(), m.display_name(), settings.weights.get(m).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join("\n");

    let usage = match settings.plan {
        Plan::Free if !settings.unlimited_usage => format!(
            "{}/{} AI analyses used today",
            settings.usage.used_on(today),
            FREE_DAILY_REMOTE_LIMIT
        ),
        _ => "unlimited AI analyses".to_string(),
    };

    let mut message = format!(
        "⚙️ **Settings**\n🎭 Personality: {}\n💳 Plan: {:?} ({})\n🤖 Model: {}\n🔑 API key: {}\n🐞 Debug: {}\n\n**Weights** (total {})\n{}",
        settings.personality.key(),
        settings.plan,
        usage,
        settings.model,
        settings.credential().map(mask_key).unwrap_or_else(|| "not set".to_string()),
        if settings.debug { "on" } else { "off" },
        settings.total_weight(),
        weights
    );
    if settings.total_weight() != 100 {
        message.push_str("\n\n⚠️ Weights do not add up to 100.");
    }
    message
}

/// Current settings (defaults when nothing was saved yet)
pub fn get_settings<S: DiaryStorage>(storage: &S, today: NaiveDate) -> Result<SettingsResponse, ToolError> {
    let settings = storage.load_settings()?;
    let message = format_settings(&settings, today);

    // the key itself never leaves the server
    let mut shown = settings;
    shown.api_key = shown.credential().map(mask_key);

    Ok(SettingsResponse { settings: shown, message })
}

/// Merge `params` into the stored settings and save them
pub fn update_settings<S: DiaryStorage>(
    storage: &S,
    params: UpdateSettingsParams,
    today: NaiveDate,
) -> Result<SettingsResponse, ToolError> {
    let mut settings = storage.load_settings()?;

    if let Some(personality) = parse_tag::<Personality>(params.personality.as_deref())? {
        settings.personality = personality;
    }
    if let Some(raw) = params.weights {
        let weights = raw
            .iter()
            .map(|(key, weight)| key.parse::<Metric>().map(|metric| (metric, *weight)))
            .collect::<Result<Weights, _>>()?;
        settings.set_weights(weights)?;
    }
    if let Some(plan) = parse_tag::<Plan>(params.plan.as_deref())? {
        settings.plan = plan;
    }
    if let Some(unlimited) = params.unlimited_usage {
        settings.unlimited_usage = unlimited;
    }
    if let Some(key) = params.api_key {
        let key = key.trim().to_string();
        settings.api_key = (!key.is_empty()).then_some(key);
    }
    if let Some(model) = params.model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
        settings.model = model;
    }
    if let Some(debug) = params.debug {
        settings.debug = debug;
    }

    storage.put_settings(&settings)?;
    tracing::info!("Settings updated");

    let mut response = get_settings(storage, today)?;
    response.message = format!("✅ Settings saved\n\n{}", response.message);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_weights;
    use crate::storage::SqliteStorage;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
    }

    #[test]
    fn test_defaults_when_unsaved() {
        let storage = SqliteStorage::in_memory().unwrap();
        let response = get_settings(&storage, today()).unwrap();
        assert_eq!(response.settings, Settings::default());
        assert!(response.message.contains("warm_companion"));
        assert!(response.message.contains("0/5 AI analyses used today"));
    }

    #[test]
    fn test_partial_update_merges() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = UpdateSettingsParams {
            personality: Some("growth_coach".to_string()),
            api_key: Some("secret-key-1234".to_string()),
            ..UpdateSettingsParams::default()
        };
        let response = update_settings(&storage, params, today()).unwrap();
        assert_eq!(response.settings.api_key.as_deref(), Some("****1234"));

        let stored = storage.get_settings().unwrap().unwrap();
        assert_eq!(stored.personality, Personality::GrowthCoach);
        assert_eq!(stored.api_key.as_deref(), Some("secret-key-1234"));
        assert_eq!(stored.weights, default_weights());
        assert_eq!(stored.plan, Plan::Free);

        // clearing the key
        let params = UpdateSettingsParams {
            api_key: Some(String::new()),
            ..UpdateSettingsParams::default()
        };
        update_settings(&storage, params, today()).unwrap();
        assert!(storage.get_settings().unwrap().unwrap().api_key.is_none());
    }

    #[test]
    fn test_weights_update() {
        let storage = SqliteStorage::in_memory().unwrap();
        let weights: BTreeMap<String, u32> = [("health", 50), ("finance", 50)]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        let params = UpdateSettingsParams {
            weights: Some(weights),
            ..UpdateSettingsParams::default()
        };
        update_settings(&storage, params, today()).unwrap();

        let stored = storage.get_settings().unwrap().unwrap();
        assert_eq!(stored.weights.len(), 2);
        assert_eq!(stored.weights.get(&Metric::Money), Some(&50));
    }

    #[test]
    fn test_invalid_updates_are_rejected() {
        let storage = SqliteStorage::in_memory().unwrap();

        let too_heavy = UpdateSettingsParams {
            weights: Some([("rest".to_string(), 80)].into_iter().collect()),
            ..UpdateSettingsParams::default()
        };
        assert!(update_settings(&storage, too_heavy, today()).is_err());

        let unknown = UpdateSettingsParams {
            weights: Some([("sleep".to_string(), 10)].into_iter().collect()),
            ..UpdateSettingsParams::default()
        };
        assert!(update_settings(&storage, unknown, today()).is_err());

        let bad_plan = UpdateSettingsParams {
            plan: Some("gold".to_string()),
            ..UpdateSettingsParams::default()
        };
        assert!(update_settings(&storage, bad_plan, today()).is_err());

        assert!(storage.get_settings().unwrap().is_none());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abc"), "****");
        assert_eq!(mask_key("abcdefgh"), "****efgh");
    }
}
