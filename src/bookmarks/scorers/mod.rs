pub use skim::SkimScorer;
pub use token_sort::PartialTokenSort;

use crate::bookmarks::{BuildError, Score};

mod skim;
mod token_sort;

pub trait Scorer: Send + Sync {
    /// Scores how similar the haystack is to the query, higher is more similar.
    /// Must return the same score for the same inputs, and is never called with an empty query.
    fn score(&self, haystack: &str, query: &str) -> Score;
}

pub const SCORER_NAMES: &[&str] = &["token_sort", "skim"];

/// Looks up a scorer by the name used in the preferences.
pub fn by_name(name: &str) -> Result<Box<dyn Scorer>, BuildError> {
    match name {
        "token_sort" => Ok(Box::new(PartialTokenSort)),
        "skim" => Ok(Box::new(SkimScorer::default())),
        _ => Err(BuildError::MissingDependency { name: name.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_knows_all_listed_scorers() {
        for name in SCORER_NAMES {
            assert!(by_name(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn by_name_rejects_unknown_scorer() {
        let err = by_name("levenshtein").err().unwrap();
        assert!(matches!(err, BuildError::MissingDependency { ref name } if name == "levenshtein"));
        assert_eq!(err.to_string(), "Scorer 'levenshtein' is not available");
    }
}
