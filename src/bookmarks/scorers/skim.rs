use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::bookmarks::{Score, Scorer, MAX_SCORE};

/// Skim style subsequence scoring, scaled against the score the query gets on itself.
pub struct SkimScorer(SkimMatcherV2);

impl Default for SkimScorer {
    fn default() -> Self {
        Self(SkimMatcherV2::default().ignore_case())
    }
}

impl Scorer for SkimScorer {
    fn score(&self, haystack: &str, query: &str) -> Score {
        let Some(best) = self.0.fuzzy_match(query, query).filter(|best| *best > 0) else {
            return 0;
        };

        self.0
            .fuzzy_match(haystack, query)
            .map(|score| (score.max(0) * MAX_SCORE as i64 / best).min(MAX_SCORE as i64) as Score)
            .unwrap_or(0)
    }
}
