/// Remote (LLM) analysis with silent fallback to the local analyzer
///
/// A remote provider is an opaque, fallible text generator. Entry creation
/// never fails because of it: missing credentials, the free plan limit,
/// transport errors and malformed responses all end in a local analysis.

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analyzer::{AnalysisInput, LocalAnalyzer};
use crate::domain::{Analysis, AnalysisDebug, Settings};

/// Errors reported by remote providers
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("API quota exceeded (429): the usage limit for this model was reached, try another model or retry later")]
    QuotaExceeded,

    #[error("Model not found (404): '{model}' is not available for this account")]
    ModelNotFound { model: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Classify a failed HTTP response by status and body text
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        let lower = body.to_lowercase();
        if status == 429 || lower.contains("quota") {
            ProviderError::QuotaExceeded
        } else if status == 404 || lower.contains("not found") {
            ProviderError::ModelNotFound { model: model.to_string() }
        } else {
            ProviderError::Http { status, body }
        }
    }
}

/// A text-generation backend used for remote analyses
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Send `prompt` to `model` and return the raw generated text
    async fn generate(&self, model: &str, api_key: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Where an analysis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOrigin {
    /// Produced by the remote provider
    Remote,
    /// No provider or no API key configured
    Local,
    /// Free plan daily limit reached
    UsageLimited,
    /// The remote attempt failed
    Fallback,
}

impl AnalysisOrigin {
    pub fn describe(&self) -> &'static str {
        match self {
            AnalysisOrigin::Remote => "🤖 AI analysis",
            AnalysisOrigin::Local => "📝 Local analysis",
            AnalysisOrigin::UsageLimited => "📝 Local analysis (daily AI limit reached)",
            AnalysisOrigin::Fallback => "📝 Local analysis (AI unavailable)",
        }
    }
}

/// Analyze one entry, remotely when possible
///
/// At most one remote attempt is made. On success the daily usage counter in
/// `settings` is incremented, so callers should persist settings when the
/// origin is `Remote`.
pub async fn analyze_entry(
    settings: &mut Settings,
    provider: Option<&dyn AnalysisProvider>,
    input: &AnalysisInput,
    today: NaiveDate,
) -> (Analysis, AnalysisOrigin) {
    let local = || LocalAnalyzer::new().analyze(input);

    let (Some(provider), Some(api_key)) = (provider, settings.credential()) else {
        return (local(), AnalysisOrigin::Local);
    };

    if settings.remote_limit_reached(today) {
        info!("Free plan limit reached for {}, using local analysis", today);
        return (local(), AnalysisOrigin::UsageLimited);
    }

    let prompt_text = prompt::build_prompt(input);
    let result = match provider.generate(&settings.model, api_key, &prompt_text).await {
        Ok(raw) => prompt::parse_response(&raw).map(|analysis| (analysis, raw)),
        Err(e) => Err(e),
    };

    match result {
        Ok((mut analysis, raw)) => {
            if settings.debug {
                analysis.debug = Some(AnalysisDebug {
                    prompt: prompt_text,
                    raw_response: raw,
                });
            }
            settings.usage.record(today);
            info!("Remote analysis by {} ({})", provider.name(), settings.model);
            (analysis, AnalysisOrigin::Remote)
        }
        Err(e) => {
            warn!("Remote analysis failed, falling back to local analysis: {}", e);
            (local(), AnalysisOrigin::Fallback)
        }
    }
}

/// Outcome of a successful connection test
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub model: String,
    pub prompt: String,
    pub response: String,
}

/// Send a short prompt to check the key and model
///
/// Unlike entry analysis, failures are returned to the caller.
pub async fn test_connection(
    settings: &Settings,
    provider: &dyn AnalysisProvider,
) -> Result<ConnectionReport, ProviderError> {
    let api_key = settings.credential().ok_or(ProviderError::MissingApiKey)?;
    let response = provider
        .generate(&settings.model, api_key, prompt::CONNECTION_TEST_PROMPT)
        .await?;

    Ok(ConnectionReport {
        model: settings.model.clone(),
        prompt: prompt::CONNECTION_TEST_PROMPT.to_string(),
        response,
    })
}
