use std::error::Error;

pub use chromium::{flatten, ChromiumBookmarks, Node};

use crate::bookmarks::Item;

mod chromium;

pub trait Provider: Send + Sync {
    fn title(&self) -> String {
        "Unknown".into()
    }

    /// Loads all items that this provider can provide.
    fn load(&self) -> Result<Vec<Item>, Box<dyn Error + Send + Sync>>;
}
