use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::bookmarks::{Item, Provider};

/// Reads the `Bookmarks` file written by Chromium based browsers.
pub struct ChromiumBookmarks {
    path: PathBuf,
}

impl ChromiumBookmarks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Provider for ChromiumBookmarks {
    fn title(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Item>, Box<dyn Error + Send + Sync>> {
        let fp = File::open(&self.path)?;
        let file: BookmarkFile = serde_json::from_reader(BufReader::new(fp))?;

        let roots = file.roots
            .values()
            .map(Node::deserialize)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(flatten(roots))
    }
}

#[derive(Deserialize)]
struct BookmarkFile {
    // keeps the order of the file, the bookmark bar comes first
    roots: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub children: Option<Vec<Node>>,
}

/// Walks the bookmark tree breadth first and returns one item per bookmark with a url.
///
/// Nodes without a known type are skipped, as are bookmarks with an empty url.
/// Siblings are emitted before the children of any later sibling.
pub fn flatten(roots: Vec<Node>) -> Vec<Item> {
    let mut queue = VecDeque::from(roots);
    let mut items = Vec::new();

    while let Some(node) = queue.pop_front() {
        match node.kind.as_deref() {
            Some("folder") => {
                queue.extend(node.children.into_iter().flatten());
            }

            Some("url") => {
                let Some(url) = node.url.filter(|url| !url.is_empty()) else {
                    continue;
                };

                items.push(Item::bookmark(node.name.unwrap_or_default(), url));
            }

            _ => (),
        }
    }

    items
}
