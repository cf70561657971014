/// Period buckets (week/month/year) and chart sampling
///
/// Weeks follow ISO-8601: they start on Monday and end on Sunday, and a week
/// belongs to the month/year that contains its Thursday.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{Datelike, Duration, Months, NaiveDate};
use crate::domain::{DiaryEntry, DomainError, MetricScores};

/// Kind of period a review covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Week,
    Month,
    Year,
}

impl PeriodKind {
    /// Maximum chart points shown for this period
    pub fn point_budget(&self) -> usize {
        match self {
            PeriodKind::Week => 7,
            PeriodKind::Month => 31,
            PeriodKind::Year => 52,
        }
    }
}

impl FromStr for PeriodKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            "year" => Ok(PeriodKind::Year),
            other => Err(DomainError::UnknownTag {
                kind: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The period of `kind` that contains `reference`
    pub fn containing(reference: NaiveDate, kind: PeriodKind) -> Self {
        match kind {
            PeriodKind::Week => {
                let monday = reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
                Self {
                    start: monday,
                    end: monday + Duration::days(6),
                }
            }
            PeriodKind::Month => {
                let start = reference.with_day(1).unwrap_or(reference);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(reference);
                Self { start, end }
            }
            PeriodKind::Year => Self {
                start: NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference),
                end: NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference),
            },
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// Move `anchor` by `steps` periods (negative steps go back in time)
///
/// Month and year steps keep the day of month, clamped to the end of a
/// shorter month (Jan 31 + 1 month = Feb 28/29).
pub fn navigate(anchor: NaiveDate, kind: PeriodKind, steps: i32) -> NaiveDate {
    let months = |n: i32| Months::new(n.unsigned_abs());
    let moved = match kind {
        PeriodKind::Week => anchor.checked_add_signed(Duration::weeks(steps as i64)),
        PeriodKind::Month if steps >= 0 => anchor.checked_add_months(months(steps)),
        PeriodKind::Month => anchor.checked_sub_months(months(steps)),
        PeriodKind::Year if steps >= 0 => anchor.checked_add_months(months(steps.saturating_mul(12))),
        PeriodKind::Year => anchor.checked_sub_months(months(steps.saturating_mul(12))),
    };
    moved.unwrap_or(anchor)
}

/// ISO-8601 week number of `date`
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Month (1-12) and week-of-month of the ISO week containing `date`
///
/// The week belongs to the month of its Thursday; week 1 is the week holding
/// that month's first Thursday.
pub fn week_of_month(date: NaiveDate) -> (u32, u32) {
    let thursday = date + Duration::days(3 - date.weekday().num_days_from_monday() as i64);
    let first_of_month = thursday.with_day(1).unwrap_or(thursday);
    let offset = (3 + 7 - first_of_month.weekday().num_days_from_monday() as i64) % 7;
    let first_thursday = first_of_month + Duration::days(offset);

    let week = (thursday - first_thursday).num_days() / 7 + 1;
    (thursday.month(), week.max(1) as u32)
}

/// Human-readable label for the period containing `reference`
pub fn period_label(reference: NaiveDate, kind: PeriodKind) -> String {
    match kind {
        PeriodKind::Week => {
            let (month, week) = week_of_month(reference);
            let thursday = reference + Duration::days(3 - reference.weekday().num_days_from_monday() as i64);
            format!("{} {}, week {}", thursday.year(), month_abbrev(month), week)
        }
        PeriodKind::Month => format!("{} {}", reference.year(), month_abbrev(reference.month())),
        PeriodKind::Year => reference.year().to_string(),
    }
}

fn month_abbrev(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Entries whose date falls inside `range`, sorted ascending by date
pub fn entries_in_range<'a>(entries: &'a [DiaryEntry], range: &DateRange) -> Vec<&'a DiaryEntry> {
    let mut filtered: Vec<&DiaryEntry> = entries.iter().filter(|e| range.contains(e.date)).collect();
    filtered.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    filtered
}

/// Fixed-stride downsampling of an already sorted sequence
///
/// When `items` exceeds `budget`, every `ceil(n / budget)`-th item is kept,
/// starting at index 0. Skipped items are dropped, not averaged.
pub fn stride_sample<T: Clone>(items: &[T], budget: usize) -> Vec<T> {
    if budget == 0 || items.len() <= budget {
        return items.to_vec();
    }
    let stride = items.len().div_ceil(budget);
    items.iter().step_by(stride).cloned().collect()
}

/// One point of the metric trend chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Date formatted as MM/DD
    pub label: String,
    pub date: NaiveDate,
    pub scores: MetricScores,
}

/// Chart points for entries already sorted ascending by date
pub fn chart_points(sorted: &[&DiaryEntry], kind: PeriodKind) -> Vec<ChartPoint> {
    stride_sample(sorted, kind.point_budget())
        .into_iter()
        .map(|entry| ChartPoint {
            label: entry.date.format("%m/%d").to_string(),
            date: entry.date,
            scores: entry.analysis.metric_scores.clone(),
        })
        .collect()
}
