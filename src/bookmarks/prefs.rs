use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bookmarks::PreferenceError;

/// Environment variable that overrides where the preferences are read from.
pub const PREFERENCES_ENV: &str = "BOOKMARKS_PREFERENCES";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chromium,
    Google,
    Yandex,
    Custom,
}

impl Browser {
    /// Where the browser keeps its bookmarks, `None` for a custom file.
    pub fn bookmarks_file(self) -> Option<&'static str> {
        match self {
            Browser::Chromium => Some("~/.config/chromium/Default/Bookmarks"),
            Browser::Google => Some("~/.config/google-chrome/Default/Bookmarks"),
            Browser::Yandex => Some("~/.config/yandex-browser-beta/Default/Bookmarks"),
            Browser::Custom => None,
        }
    }
}

impl FromStr for Browser {
    type Err = PreferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "chromium" => Ok(Browser::Chromium),
            "google" => Ok(Browser::Google),
            "yandex" => Ok(Browser::Yandex),
            "custom" => Ok(Browser::Custom),
            _ => Err(PreferenceError::UnknownBrowser(value.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Optional prefix typed before the query.
    pub keyword: String,
    pub browser: Browser,
    /// Only used with [`Browser::Custom`].
    pub bookmarks_file: String,
    pub scorer: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            keyword: "b".into(),
            browser: Browser::Chromium,
            bookmarks_file: String::new(),
            scorer: "token_sort".into(),
        }
    }
}

impl Preferences {
    /// Reads the preferences from a json file, a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, PreferenceError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(PreferenceError::Unreadable { path: path.into(), source }),
        };

        serde_json::from_str(&contents)
            .map_err(|source| PreferenceError::Malformed { path: path.into(), source })
    }

    /// `$BOOKMARKS_PREFERENCES`, or `preferences.json` in the user's config directory.
    pub fn default_path() -> Option<PathBuf> {
        match std::env::var_os(PREFERENCES_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("bookmarks").join("preferences.json")),
        }
    }

    /// Changes a single preference by its id.
    pub fn set(&mut self, id: &str, value: &str) -> Result<(), PreferenceError> {
        match id {
            "keyword" => self.keyword = value.into(),
            "browser" => self.browser = value.parse()?,
            "bookmarks_file" => self.bookmarks_file = value.into(),
            "scorer" => self.scorer = value.into(),
            _ => return Err(PreferenceError::UnknownPreference(id.into())),
        }

        Ok(())
    }

    /// The bookmarks file to read, `None` if no file is configured.
    pub fn bookmarks_path(&self) -> Option<PathBuf> {
        let file = match self.browser.bookmarks_file() {
            Some(file) => file,
            None => self.bookmarks_file.as_str(),
        };

        if file.is_empty() {
            return None;
        }

        Some(expand_home(file))
    }

    /// Strips the keyword from the typed input, if it starts with it.
    pub fn argument<'a>(&self, input: &'a str) -> &'a str {
        if self.keyword.is_empty() {
            return input;
        }

        input
            .strip_prefix(self.keyword.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
            .unwrap_or(input)
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => rest,
            None => return PathBuf::from(path),
        },
        None => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
