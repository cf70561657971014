/// Tool for listing diary entries
///
/// This module implements the diary_list MCP tool.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::listing::{filter_entries, month_counts, parse_month};
use crate::analytics::{weighted_score, ListQuery, SortOrder};
use crate::domain::DomainError;
use crate::storage::DiaryStorage;
use crate::tools::ToolError;

/// Default number of entries returned
const DEFAULT_LIMIT: usize = 20;

/// Parameters for listing entries
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListEntriesParams {
    /// Only entries of this month (YYYY-MM)
    pub month: Option<String>,
    /// Case-insensitive text to find in content or summary
    pub search: Option<String>,
    /// "newest" (default) or "oldest"
    pub sort: Option<String>,
    /// Maximum number of entries (default 20)
    pub limit: Option<usize>,
}

/// One row of the list
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub id: String,
    pub date: String,
    pub summary: String,
    pub weighted_score: f64,
    pub has_images: bool,
}

/// Response from listing entries
#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<EntrySummary>,
    /// Matches before the limit was applied
    pub total_matches: usize,
    pub month_counts: BTreeMap<String, usize>,
    pub message: String,
}

/// List entries using the provided storage
pub fn list_entries<S: DiaryStorage>(
    storage: &S,
    params: ListEntriesParams,
) -> Result<ListEntriesResponse, ToolError> {
    let month = match params.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => Some(parse_month(m).ok_or_else(|| DomainError::InvalidDate(m.to_string()))?),
        None => None,
    };
    let order = match params.sort.as_deref().map(|s| s.trim().to_lowercase()) {
        None => SortOrder::Newest,
        Some(s) if s == "newest" || s.is_empty() => SortOrder::Newest,
        Some(s) if s == "oldest" => SortOrder::Oldest,
        Some(other) => return Err(ToolError::InvalidParams(format!("sort must be 'newest' or 'oldest', got '{}'", other))),
    };

    let all = storage.list_entries()?;
    let weights = storage.load_settings()?.weights;
    let query = ListQuery {
        month,
        search: params.search,
        order,
    };

    let matched = filter_entries(&all, &query);
    let total_matches = matched.len();
    let entries: Vec<EntrySummary> = matched
        .into_iter()
        .take(params.limit.unwrap_or(DEFAULT_LIMIT))
        .map(|e| EntrySummary {
            id: e.id.to_string(),
            date: e.date.to_string(),
            summary: e.analysis.summary.clone(),
            weighted_score: weighted_score(Some(e), &weights),
            has_images: e.has_images(),
        })
        .collect();

    let message = if entries.is_empty() {
        "No diary entries found. Write your first entry to get started!".to_string()
    } else {
        let rows = entries
            .iter()
            .map(|e| {
                format!(
                    "📅 **{}** (ID: {}) ⭐ {:.1}{}\n   {}",
                    e.date,
                    e.id,
                    e.weighted_score,
                    if e.has_images { " 🖼️" } else { "" },
                    e.summary
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("📖 **Diary** ({} of {} entries)\n\n{}", entries.len(), total_matches, rows)
    };

    Ok(ListEntriesResponse {
        entries,
        total_matches,
        month_counts: month_counts(&all),
        message,
    })
}
