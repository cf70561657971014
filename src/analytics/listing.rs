/// Entry list helpers: month filter, search, sort and per-month counts

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::Datelike;
use crate::domain::DiaryEntry;

/// Sort order for entry lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Filters applied when listing entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Month as (year, month)
    pub month: Option<(i32, u32)>,
    /// Case-insensitive text matched against content and summary
    pub search: Option<String>,
    pub order: SortOrder,
}

impl ListQuery {
    fn matches(&self, entry: &DiaryEntry, needle: Option<&str>) -> bool {
        if let Some((year, month)) = self.month {
            if entry.date.year() != year || entry.date.month() != month {
                return false;
            }
        }
        match needle {
            Some(needle) => {
                entry.content.to_lowercase().contains(needle)
                    || entry.analysis.summary.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

/// Apply `query` to `entries`
pub fn filter_entries<'a>(entries: &'a [DiaryEntry], query: &ListQuery) -> Vec<&'a DiaryEntry> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut matched: Vec<&DiaryEntry> = entries
        .iter()
        .filter(|e| query.matches(e, needle.as_deref()))
        .collect();

    matched.sort_by(|a, b| {
        let ord = a.date.cmp(&b.date).then(a.id.cmp(&b.id));
        match query.order {
            SortOrder::Newest => ord.reverse(),
            SortOrder::Oldest => ord,
        }
    });
    matched
}

/// Number of entries per `YYYY-MM` month
pub fn month_counts(entries: &[DiaryEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.date.format("%Y-%m").to_string()).or_insert(0) += 1;
    }
    counts
}

/// Parse a `YYYY-MM` month filter
pub fn parse_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalysisInput, LocalAnalyzer};
    use crate::domain::{EntryDraft, Personality};
    use chrono::NaiveDate;

    fn entry(date: &str, content: &str) -> DiaryEntry {
        let draft = EntryDraft {
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            ..EntryDraft::with_content(content)
        };
        let analysis = LocalAnalyzer::new().analyze(&AnalysisInput::from_draft(&draft, Personality::default()));
        DiaryEntry::from_draft(draft, Personality::default(), analysis).unwrap()
    }

    fn sample() -> Vec<DiaryEntry> {
        vec![
            entry("2025-05-30", "Quiet Friday"),
            entry("2025-06-02", "Went to the PARK"),
            entry("2025-06-10", "park again with friends"),
            entry("2025-06-20", "rainy reading day"),
        ]
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let entries = sample();
        let listed = filter_entries(&entries, &ListQuery::default());
        let dates: Vec<String> = listed.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-06-20", "2025-06-10", "2025-06-02", "2025-05-30"]);
    }

    #[test]
    fn test_month_filter_and_oldest_order() {
        let entries = sample();
        let query = ListQuery {
            month: Some((2025, 6)),
            order: SortOrder::Oldest,
            ..ListQuery::default()
        };
        let listed = filter_entries(&entries, &query);
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].date.to_string(), "2025-06-02");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let entries = sample();
        let query = ListQuery {
            search: Some("Park".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(filter_entries(&entries, &query).len(), 2);

        // blank search matches everything
        let query = ListQuery {
            search: Some("   ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(filter_entries(&entries, &query).len(), 4);
    }

    #[test]
    fn test_month_counts() {
        let counts = month_counts(&sample());
        assert_eq!(counts.get("2025-05"), Some(&1));
        assert_eq!(counts.get("2025-06"), Some(&3));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06"), Some((2025, 6)));
        assert_eq!(parse_month("2025-13"), None);
        assert_eq!(parse_month("June"), None);
    }
}
