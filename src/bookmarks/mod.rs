use std::sync::Arc;

pub use error::*;
pub use incremental::*;
pub use prefs::*;
pub use providers::*;
pub use scorers::*;
pub use session::*;
pub use store::*;

mod error;
mod incremental;
mod prefs;
mod providers;
mod scorers;
mod session;
mod store;

/// Similarity of a haystack to a query, from 0 (unrelated) to 100.
pub type Score = u8;

pub const MAX_SCORE: Score = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// The label will be used to display the item in the UI.
    pub label: String,

    /// The URL that will be opened on selection.
    pub value: String,

    /// The haystack field will be used for actual querying.
    pub haystack: String,
}

impl Item {
    /// Builds a bookmark item, searching on the lower-cased name followed by the url.
    pub fn bookmark(name: impl Into<String>, url: impl Into<String>) -> Self {
        let label = name.into();
        let value = url.into();
        let haystack = label.to_lowercase() + &value.to_lowercase();

        Item { label, value, haystack }
    }
}

/// An item together with its score against the query that ranked it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredItem {
    pub item: Arc<Item>,
    pub score: Score,

    /// Position of the item in the candidate store, used to break score ties.
    pub rank: usize,
}
