use crate::bookmarks::{
    by_name, BuildError, CandidateStore, ChromiumBookmarks, IncrementalMatcher, PreferenceError,
    Preferences, ScoredItem,
};

/// How many entries are shown to the user.
pub const RESULT_LIMIT: usize = 10;

/// A row in the result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultEntry {
    Bookmark { name: String, url: String },

    /// Replaces all results while the bookmarks cannot be loaded. Can not be launched.
    Error { message: String, description: String },
}

impl ResultEntry {
    /// The URL to open when the entry is selected.
    pub fn url(&self) -> Option<&str> {
        match self {
            ResultEntry::Bookmark { url, .. } => Some(url),
            ResultEntry::Error { .. } => None,
        }
    }
}

impl From<&BuildError> for ResultEntry {
    fn from(err: &BuildError) -> Self {
        ResultEntry::Error {
            message: err.to_string(),
            description: err.description(),
        }
    }
}

/// Ties the preferences to the bookmarks they point at and the matcher ranking them.
pub struct Session {
    preferences: Preferences,
    store: CandidateStore,
    matcher: Option<IncrementalMatcher>,
    last_error: Option<BuildError>,
}

impl Session {
    pub fn new(preferences: Preferences) -> Self {
        let mut session = Self {
            preferences,
            store: CandidateStore::default(),
            matcher: None,
            last_error: None,
        };

        session.rebuild();
        session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn last_error(&self) -> Option<&BuildError> {
        self.last_error.as_ref()
    }

    /// Applies new preferences. The bookmarks are only reloaded if the file or the scorer changed.
    pub fn set_preferences(&mut self, preferences: Preferences) {
        let reload = preferences.bookmarks_path() != self.preferences.bookmarks_path()
            || preferences.scorer != self.preferences.scorer;

        self.preferences = preferences;

        if reload {
            self.rebuild();
        }
    }

    /// Changes a single preference, see [`Preferences::set`].
    pub fn update_preference(&mut self, id: &str, value: &str) -> Result<(), PreferenceError> {
        let mut preferences = self.preferences.clone();
        preferences.set(id, value)?;
        self.set_preferences(preferences);
        Ok(())
    }

    /// Reloads the bookmarks and starts a fresh matcher over them.
    /// On failure the error is remembered and replaces all results until a rebuild succeeds.
    pub fn rebuild(&mut self) {
        self.last_error = None;

        if let Err(err) = self.try_rebuild() {
            log::warn!("{err}: {}", err.description());
            if let Some(source) = std::error::Error::source(&err) {
                log::debug!("caused by: {source}");
            }

            self.last_error = Some(err);
        }
    }

    fn try_rebuild(&mut self) -> Result<(), BuildError> {
        let scorer = by_name(&self.preferences.scorer)?;
        let path = self.preferences.bookmarks_path().ok_or(BuildError::UnconfiguredSource)?;

        let items = self.store.rebuild(&ChromiumBookmarks::new(path))?;

        let mut matcher = IncrementalMatcher::new(scorer);
        matcher.reset(items);
        self.matcher = Some(matcher);

        Ok(())
    }

    /// The full ranking for the query, empty while an error is active.
    pub fn matches(&mut self, query: Option<&str>) -> &[ScoredItem] {
        if self.last_error.is_some() {
            return &[];
        }

        match self.matcher.as_mut() {
            Some(matcher) => matcher.matches(query),
            None => &[],
        }
    }

    /// The entries to display for the query: the best few bookmarks, or the active error.
    pub fn results(&mut self, query: &str) -> Vec<ResultEntry> {
        if let Some(err) = &self.last_error {
            return vec![err.into()];
        }

        self.matches(Some(query))
            .iter()
            .take(RESULT_LIMIT)
            .map(|scored| ResultEntry::Bookmark {
                name: scored.item.label.clone(),
                url: scored.item.value.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::bookmarks::Browser;

    fn bookmark_file(dir: &Path, name: &str, bookmarks: &[(&str, &str)]) -> String {
        let children = bookmarks
            .iter()
            .map(|(name, url)| serde_json::json!({ "type": "url", "name": name, "url": url }))
            .collect::<Vec<_>>();

        let contents = serde_json::json!({
            "roots": {
                "bookmark_bar": { "type": "folder", "name": "Bookmarks bar", "children": children }
            },
            "version": 1
        });

        let path = dir.join(name);
        fs::write(&path, contents.to_string()).unwrap();
        path.display().to_string()
    }

    fn custom(path: &str) -> Preferences {
        Preferences {
            browser: Browser::Custom,
            bookmarks_file: path.into(),
            ..Preferences::default()
        }
    }

    fn names(entries: &[ResultEntry]) -> Vec<&str> {
        entries
            .iter()
            .map(|entry| match entry {
                ResultEntry::Bookmark { name, .. } => name.as_str(),
                ResultEntry::Error { message, .. } => message.as_str(),
            })
            .collect()
    }

    const GIT: &[(&str, &str)] = &[("GitHub", "https://github.com"), ("GitLab", "https://gitlab.com")];

    #[test]
    fn results_rank_bookmarks() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(custom(&bookmark_file(dir.path(), "Bookmarks", GIT)));

        assert!(session.last_error().is_none());
        assert_eq!(names(&session.results("git")), vec!["GitHub", "GitLab"]);
        assert_eq!(names(&session.results("github")), vec!["GitHub", "GitLab"]);
        assert_eq!(session.results("github")[0].url(), Some("https://github.com"));
        assert!(session.results("").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let bookmarks = (0..25)
            .map(|n| (format!("Page {n}"), format!("https://example.com/{n}")))
            .collect::<Vec<_>>();
        let bookmarks = bookmarks.iter().map(|(n, u)| (n.as_str(), u.as_str())).collect::<Vec<_>>();

        let mut session = Session::new(custom(&bookmark_file(dir.path(), "Bookmarks", &bookmarks)));

        assert_eq!(session.results("page").len(), RESULT_LIMIT);
        assert_eq!(session.matches(Some("page")).len(), 25);
    }

    #[test]
    fn unconfigured_source_shows_single_error() {
        let mut session = Session::new(custom(""));

        assert!(matches!(session.last_error(), Some(BuildError::UnconfiguredSource)));
        assert_eq!(
            session.results("git"),
            vec![ResultEntry::Error {
                message: "Bookmarks file is not specified".into(),
                description: "Please specify either browser or bookmarks file in Preferences".into(),
            }]
        );
        assert!(session.matches(Some("git")).is_empty());
    }

    #[test]
    fn unreadable_source_shows_single_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Bookmarks").display().to_string();
        let mut session = Session::new(custom(&missing));

        let results = session.results("git");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url(), None);
        assert_eq!(names(&results), vec![format!("Failed to open file '{missing}'").as_str()]);
    }

    #[test]
    fn missing_scorer_is_reported_first() {
        let mut session = Session::new(Preferences { scorer: "nope".into(), ..custom("") });

        assert!(matches!(session.last_error(), Some(BuildError::MissingDependency { .. })));
        assert_eq!(names(&session.results("git")), vec!["Scorer 'nope' is not available"]);
    }

    #[test]
    fn failed_rebuild_hides_previous_bookmarks_until_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let good = bookmark_file(dir.path(), "Bookmarks", GIT);
        let mut session = Session::new(custom(&good));
        session.results("git");

        session.update_preference("bookmarks_file", "/does/not/exist").unwrap();
        assert_eq!(session.results("git").len(), 1);
        assert!(session.results("git")[0].url().is_none());
        assert_eq!(session.store().current().len(), 2);

        session.update_preference("bookmarks_file", &good).unwrap();
        assert!(session.last_error().is_none());
        assert_eq!(names(&session.results("git")), vec!["GitHub", "GitLab"]);
    }

    #[test]
    fn changing_the_file_reloads_bookmarks() {
        let dir = tempfile::tempdir().unwrap();
        let first = bookmark_file(dir.path(), "First", GIT);
        let second = bookmark_file(dir.path(), "Second", &[("Docs", "https://docs.rs")]);

        let mut session = Session::new(custom(&first));
        session.results("git");

        session.update_preference("bookmarks_file", &second).unwrap();
        assert_eq!(names(&session.results("git")), vec!["Docs"]);
    }

    #[test]
    fn unrelated_preference_change_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = bookmark_file(dir.path(), "Bookmarks", GIT);

        let mut session = Session::new(custom(&path));
        session.results("git");

        // the file is gone, but the keyword change must not trigger a reload
        fs::remove_file(&path).unwrap();
        session.update_preference("keyword", "bm").unwrap();

        assert_eq!(session.preferences().keyword, "bm");
        assert!(session.last_error().is_none());
        assert_eq!(names(&session.results("gitl")), vec!["GitLab", "GitHub"]);
    }

    #[test]
    fn changing_the_scorer_reloads_bookmarks() {
        let dir = tempfile::tempdir().unwrap();
        let path = bookmark_file(dir.path(), "Bookmarks", GIT);

        let mut session = Session::new(custom(&path));
        session.update_preference("scorer", "skim").unwrap();
        assert!(session.last_error().is_none());
        assert_eq!(names(&session.results("github"))[0], "GitHub");

        session.update_preference("scorer", "unknown").unwrap();
        assert!(matches!(session.last_error(), Some(BuildError::MissingDependency { .. })));
    }

    #[test]
    fn invalid_preference_is_rejected_without_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = bookmark_file(dir.path(), "Bookmarks", GIT);

        let mut session = Session::new(custom(&path));
        assert!(session.update_preference("browser", "netscape").is_err());
        assert_eq!(session.preferences().browser, Browser::Custom);
        assert!(session.last_error().is_none());
    }
}
