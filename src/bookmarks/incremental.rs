use std::cmp::Reverse;
use std::sync::Arc;

use itertools::Itertools;

use crate::bookmarks::{Item, ScoredItem, Scorer};

/// The ranking after one more character of the query has been typed.
#[derive(Clone, Debug)]
pub struct CacheStep {
    /// `None` for the unscored baseline at the bottom of the stack.
    pub consumed: Option<char>,
    pub ranked: Vec<ScoredItem>,
}

/// Ranks the candidates on every keystroke and remembers the ranking for each prefix of the
/// query, so going back to a prefix that was already typed costs no scoring at all.
///
/// The characters consumed by the steps above the baseline always spell out the last query
/// that was matched.
pub struct IncrementalMatcher {
    scorer: Box<dyn Scorer>,
    steps: Vec<CacheStep>,
}

impl IncrementalMatcher {
    pub fn new(scorer: Box<dyn Scorer>) -> Self {
        Self {
            scorer,
            steps: vec![baseline(&[])],
        }
    }

    /// Drops all cached rankings and starts over with the given candidates.
    pub fn reset(&mut self, items: &[Arc<Item>]) {
        self.steps.clear();
        self.steps.push(baseline(items));
    }

    /// The query whose ranking is on top of the stack.
    pub fn previous_query(&self) -> String {
        self.steps.iter().filter_map(|step| step.consumed).collect()
    }

    pub fn steps(&self) -> &[CacheStep] {
        &self.steps
    }

    /// Returns all candidates ordered by their score against `query`, best first.
    /// Candidates with equal scores keep the order of the candidate store.
    ///
    /// An empty query matches nothing and leaves the cache untouched.
    pub fn matches(&mut self, query: Option<&str>) -> &[ScoredItem] {
        let query = match query {
            Some(query) if !query.is_empty() => query,
            _ => return &[],
        };

        let common = self.previous_query()
            .chars()
            .zip(query.chars())
            .take_while(|(prev, next)| prev == next)
            .count();

        self.steps.truncate(common + 1);

        for (idx, c) in query.char_indices().skip(common) {
            // a step is only ever valid for the query typed up to and including `c`
            let prefix = &query[..idx + c.len_utf8()];

            let ranked = self.top().ranked
                .iter()
                .map(|scored| ScoredItem {
                    item: Arc::clone(&scored.item),
                    score: self.scorer.score(&scored.item.haystack, prefix),
                    rank: scored.rank,
                })
                .sorted_by_key(|scored| (Reverse(scored.score), scored.rank))
                .collect_vec();

            log::trace!("scored {} candidates against {:?}", ranked.len(), prefix);

            self.steps.push(CacheStep { consumed: Some(c), ranked });
        }

        &self.top().ranked
    }

    fn top(&self) -> &CacheStep {
        // the baseline is never removed, truncate always keeps at least one step
        &self.steps[self.steps.len() - 1]
    }
}

fn baseline(items: &[Arc<Item>]) -> CacheStep {
    CacheStep {
        consumed: None,
        ranked: items
            .iter()
            .enumerate()
            .map(|(rank, item)| ScoredItem { item: Arc::clone(item), score: 0, rank })
            .collect(),
    }
}
