/// Tools for period reviews and the dashboard
///
/// This module implements the diary_review and diary_dashboard MCP tools on
/// top of the analytics engine.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::period::navigate;
use crate::analytics::{AnalyticsEngine, DashboardSummary, PeriodKind, PeriodReview};
use crate::domain::Metric;
use crate::storage::DiaryStorage;
use crate::tools::{parse_date, parse_tag, ToolError};

/// Parameters for a period review
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ReviewParams {
    /// "week" (default), "month" or "year"
    pub period: Option<String>,
    /// Any day inside the period (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    /// Periods to move from `date`, e.g. -1 for the previous week
    pub offset: Option<i32>,
}

/// Parameters for the dashboard
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DashboardParams {
    /// Day to treat as today (YYYY-MM-DD)
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: PeriodReview,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: DashboardSummary,
    pub message: String,
}

/// Review a week, month or year
pub fn review_period<S: DiaryStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: ReviewParams,
    today: NaiveDate,
) -> Result<ReviewResponse, ToolError> {
    let kind = parse_tag::<PeriodKind>(params.period.as_deref())?.unwrap_or(PeriodKind::Week);
    let anchor = parse_date(params.date.as_deref())?.unwrap_or(today);
    let reference = navigate(anchor, kind, params.offset.unwrap_or(0));

    let entries = storage.list_entries()?;
    let review = analytics.review(&entries, reference, kind);
    let message = format_review(&review);

    Ok(ReviewResponse { review, message })
}

fn format_review(review: &PeriodReview) -> String {
    let mut message = format!("📊 **Review: {}** ({})\n", review.label, review.range);
    if let Some(week) = review.iso_week {
        message.push_str(&format!("🗓️ ISO week {}\n", week));
    }

    if review.entry_count == 0 {
        message.push_str("\nNo entries in this period yet.");
        return message;
    }

    message.push_str(&format!("📝 {} entries\n\n**Averages**\n", review.entry_count));
    for metric in Metric::ALL {
        if let Some(avg) = review.averages.get(&metric) {
            message.push_str(&format!("- {} {}: {:.1}\n", metric.icon(), metric.display_name(), avg));
        }
    }

    let e = &review.emotions;
    message.push_str(&format!(
        "\n**Mood**\n😄 Happy {} | 🙂 Good {} | 😢 Sad {} | 😐 Neutral {}\n",
        e.happy, e.good, e.sad, e.neutral
    ));

    if let Some(insight) = &review.insight {
        message.push_str(&format!("\n💡 {}\n", insight.message));
    }

    let trend = review
        .chart
        .iter()
        .map(|p| p.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    message.push_str(&format!("\n📈 Chart points: {}", trend));
    message
}

/// Home screen summary
pub fn dashboard<S: DiaryStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: DashboardParams,
    today: NaiveDate,
) -> Result<DashboardResponse, ToolError> {
    let today = parse_date(params.date.as_deref())?.unwrap_or(today);
    let entries = storage.list_entries()?;
    let settings = storage.load_settings()?;

    let summary = analytics.dashboard(&entries, &settings.weights, today);

    let mut message = format!("🏠 **Dashboard** ({})\n", today);
    message.push_str(if summary.wrote_today {
        "✅ You already wrote today's diary.\n"
    } else {
        "✍️ You haven't written today's diary yet.\n"
    });
    message.push_str(&format!(
        "🔥 {}/7 days written this week | 📚 {} entries in total\n",
        summary.days_written_last_week, summary.total_entries
    ));
    match &summary.latest {
        Some(latest) => message.push_str(&format!(
            "\n**Latest entry** ({})\n💡 {}\n⭐ Weighted score: {:.1}/5",
            latest.date, latest.analysis.summary, summary.latest_weighted_score
        )),
        None => message.push_str("\nNo entries yet."),
    }

    Ok(DashboardResponse {
        dashboard: summary,
        message,
    })
}
