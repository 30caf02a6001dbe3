use std::sync::Arc;

use crate::bookmarks::{BuildError, Item, Provider};

/// The bookmarks of the current session, in the order the provider emitted them.
#[derive(Default)]
pub struct CandidateStore {
    items: Vec<Arc<Item>>,
}

impl CandidateStore {
    /// Replaces the candidates with a fresh load from the provider.
    /// Keeps the previous candidates if loading fails.
    pub fn rebuild(&mut self, provider: &dyn Provider) -> Result<&[Arc<Item>], BuildError> {
        let items = provider.load().map_err(|source| BuildError::UnreadableSource {
            name: provider.title(),
            source,
        })?;

        log::info!("loaded {} bookmarks from {}", items.len(), provider.title());

        self.items = items.into_iter().map(Arc::new).collect();
        Ok(&self.items)
    }

    pub fn current(&self) -> &[Arc<Item>] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    struct Fixed(Vec<Item>);

    impl Provider for Fixed {
        fn load(&self) -> Result<Vec<Item>, Box<dyn Error + Send + Sync>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl Provider for Failing {
        fn title(&self) -> String {
            "/missing/Bookmarks".into()
        }

        fn load(&self) -> Result<Vec<Item>, Box<dyn Error + Send + Sync>> {
            Err("no such file".into())
        }
    }

    #[test]
    fn rebuild_keeps_provider_order() {
        let mut store = CandidateStore::default();
        let provider = Fixed(vec![
            Item::bookmark("GitHub", "https://github.com"),
            Item::bookmark("GitLab", "https://gitlab.com"),
        ]);

        let items = store.rebuild(&provider).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(store.current()[0].label, "GitHub");
        assert_eq!(store.current()[1].label, "GitLab");
    }

    #[test]
    fn failed_rebuild_keeps_previous_items() {
        let mut store = CandidateStore::default();
        store.rebuild(&Fixed(vec![Item::bookmark("GitHub", "https://github.com")])).unwrap();

        let err = store.rebuild(&Failing).unwrap_err();
        assert_eq!(err.to_string(), "Failed to open file '/missing/Bookmarks'");
        assert_eq!(err.description(), "Check that file exists and is readable");

        assert_eq!(store.current().len(), 1);
        assert_eq!(store.current()[0].label, "GitHub");
    }
}
