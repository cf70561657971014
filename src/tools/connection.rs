/// Tool for checking the AI provider setup
///
/// This module implements the ai_test_connection MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::remote::{test_connection, AnalysisProvider, ConnectionReport, ProviderError};
use crate::storage::DiaryStorage;
use crate::tools::ToolError;

/// Parameters for the connection test
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TestConnectionParams {
    /// Model to try instead of the configured one
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestConnectionResponse {
    pub success: bool,
    pub report: Option<ConnectionReport>,
    pub message: String,
}

/// Send a short prompt with the stored key and model
///
/// Provider failures are reported in the response rather than as errors.
pub async fn check_connection<S: DiaryStorage>(
    storage: &S,
    provider: Option<&dyn AnalysisProvider>,
    params: TestConnectionParams,
) -> Result<TestConnectionResponse, ToolError> {
    let mut settings = storage.load_settings()?;
    if let Some(model) = params.model.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()) {
        settings.model = model;
    }

    let Some(provider) = provider else {
        return Ok(TestConnectionResponse {
            success: false,
            report: None,
            message: "❌ The server runs in offline mode, no AI provider is available".to_string(),
        });
    };

    match test_connection(&settings, provider).await {
        Ok(report) => {
            let message = format!(
                "✅ Connected to {} with {}\n📤 {}\n📥 {}",
                provider.name(),
                report.model,
                report.prompt,
                report.response.trim()
            );
            Ok(TestConnectionResponse {
                success: true,
                report: Some(report),
                message,
            })
        }
        Err(e) => {
            let hint = match &e {
                ProviderError::MissingApiKey => "Set one with settings_update.",
                ProviderError::QuotaExceeded => "Wait for the quota to reset or use another key.",
                ProviderError::ModelNotFound { .. } => "Check the model name in the settings.",
                _ => "Check the network and the API key.",
            };
            tracing::warn!("Connection test failed: {}", e);
            Ok(TestConnectionResponse {
                success: false,
                report: None,
                message: format!("❌ {}\n{}", e, hint),
            })
        }
    }
}
