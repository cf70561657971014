/// MCP tools for diary management
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to interact with the diary. Each tool takes typed parameters
/// (with a JSON Schema derived for `tools/list`) and returns a response whose
/// `message` is shown to the user.

pub mod connection;
pub mod export;
pub mod list;
pub mod review;
pub mod settings;
pub mod write;

// Re-export tool functions for easy access
pub use connection::*;
pub use export::*;
pub use list::*;
pub use review::*;
pub use settings::*;
pub use write::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics::weighted_score;
use crate::backup::BackupError;
use crate::domain::{DiaryEntry, DomainError, Weights};
use crate::remote::ProviderError;
use crate::storage::StorageError;

/// Errors returned by tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    Backup(#[from] BackupError),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParams(String),
}

/// Parse an optional `YYYY-MM-DD` parameter
pub(crate) fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DomainError::InvalidDate(s.to_string())))
        .transpose()
}

/// Parse an optional enum-like parameter through `FromStr`
pub(crate) fn parse_tag<T>(value: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

/// Multi-line rendering of an entry's analysis
pub(crate) fn format_analysis(entry: &DiaryEntry, weights: &Weights) -> String {
    let analysis = &entry.analysis;
    let scores = analysis
        .metric_scores
        .iter()
        .map(|(metric, score)| format!("{} {} {}", metric.icon(), metric.display_name(), score))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "💡 {}\n😊 Positive {}% | 😟 Negative {}%\n📊 {}\n⭐ Weighted score: {:.1}/5\n\n💬 {}",
        analysis.summary,
        analysis.emotional_score.positive,
        analysis.emotional_score.negative,
        scores,
        weighted_score(Some(entry), weights),
        analysis.feedback
    )
}
