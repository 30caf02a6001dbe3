use std::error::Error;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a candidate store rebuild can fail.
///
/// The `Display` text is the headline shown to the user in place of results,
/// [`BuildError::description`] is the hint shown underneath it.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Scorer '{name}' is not available")]
    MissingDependency { name: String },

    #[error("Bookmarks file is not specified")]
    UnconfiguredSource,

    #[error("Failed to open file '{name}'")]
    UnreadableSource {
        name: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl BuildError {
    pub fn description(&self) -> String {
        match self {
            BuildError::MissingDependency { .. } => {
                format!("Pick one of: {}", crate::bookmarks::SCORER_NAMES.join(", "))
            }
            BuildError::UnconfiguredSource => {
                "Please specify either browser or bookmarks file in Preferences".into()
            }
            BuildError::UnreadableSource { .. } => {
                "Check that file exists and is readable".into()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("unknown preference '{0}'")]
    UnknownPreference(String),

    #[error("unknown browser '{0}'")]
    UnknownBrowser(String),

    #[error("failed to read preferences from '{}'", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed preferences in '{}'", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
