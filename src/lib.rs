//! Find a browser bookmark by typing a few characters of its name or url.
//!
//! Bookmarks are read from a Chromium style `Bookmarks` file and re-ranked on every keystroke,
//! with the ranking of each typed prefix kept around for when the user backspaces.

pub use bookmarks::*;

mod bookmarks;
