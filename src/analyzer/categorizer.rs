/// Keyword categorization of entry text

use std::collections::BTreeMap;

use crate::analyzer::lexicon;
use crate::domain::LifeCategory;

/// Per-category keyword hit counts for one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<LifeCategory, u32>,
}

impl CategoryCounts {
    /// Count keyword presence for every category
    pub fn from_text(text: &str) -> Self {
        let counts = LifeCategory::PRIORITY
            .iter()
            .map(|c| (*c, lexicon::count_present(text, lexicon::keywords_for(*c))))
            .collect();
        Self { counts }
    }

    pub fn get(&self, category: LifeCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Highest count over all categories
    pub fn max_score(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Category with the most hits, or None when nothing matched
    ///
    /// Ties go to the category listed first in `LifeCategory::PRIORITY`.
    pub fn dominant(&self) -> Option<LifeCategory> {
        let mut best: Option<(LifeCategory, u32)> = None;
        for category in LifeCategory::PRIORITY {
            let count = self.get(category);
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((category, count)),
            }
        }
        best.filter(|(_, count)| *count > 0).map(|(category, _)| category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_means_no_dominant_category() {
        let counts = CategoryCounts::from_text("평범한 날");
        assert_eq!(counts.max_score(), 0);
        assert_eq!(counts.dominant(), None);
    }

    #[test]
    fn test_single_category() {
        let counts = CategoryCounts::from_text("아침에 조깅하고 산책");
        assert_eq!(counts.get(LifeCategory::Health), 2);
        assert_eq!(counts.dominant(), Some(LifeCategory::Health));
    }

    #[test]
    fn test_tie_goes_to_first_in_priority() {
        // one finance hit (주식), one hobby hit (게임)
        let counts = CategoryCounts::from_text("주식 차트 보고 게임");
        assert_eq!(counts.get(LifeCategory::Finance), 1);
        assert_eq!(counts.get(LifeCategory::Hobby), 1);
        assert_eq!(counts.dominant(), Some(LifeCategory::Finance));

        // one relationship hit (친구), one hobby hit (영화)
        let counts = CategoryCounts::from_text("친구랑 영화");
        assert_eq!(counts.dominant(), Some(LifeCategory::Relationship));
    }

    #[test]
    fn test_strict_maximum_wins() {
        // hobby: 게임, 음악 / finance: 주식
        let counts = CategoryCounts::from_text("주식 대신 게임이랑 음악");
        assert_eq!(counts.dominant(), Some(LifeCategory::Hobby));
    }
}
