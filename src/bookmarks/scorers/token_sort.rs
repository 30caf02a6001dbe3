use std::collections::HashMap;

use itertools::Itertools;

use crate::bookmarks::{Score, Scorer, MAX_SCORE};

/// Partial ratio of the word-sorted haystack and query.
///
/// Both strings are reduced to lower case ascii words which are sorted, so word order does not
/// matter. The shorter string is then aligned against every window of the longer one that a
/// matching block suggests, and the best window similarity wins. A query that appears literally
/// inside the haystack therefore scores the maximum.
pub struct PartialTokenSort;

impl Scorer for PartialTokenSort {
    fn score(&self, haystack: &str, query: &str) -> Score {
        partial_ratio(sorted_tokens(haystack).as_bytes(), sorted_tokens(query).as_bytes())
    }
}

fn sorted_tokens(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c.to_ascii_lowercase() } else { ' ' })
        .collect();

    cleaned.split_whitespace().sorted().join(" ")
}

fn partial_ratio(lhs: &[u8], rhs: &[u8]) -> Score {
    if lhs == rhs {
        return MAX_SCORE;
    }

    if lhs.is_empty() || rhs.is_empty() {
        return 0;
    }

    let (shorter, longer) = if lhs.len() <= rhs.len() { (lhs, rhs) } else { (rhs, lhs) };

    let mut best: f64 = 0.0;
    for block in matching_blocks(shorter, longer) {
        let start = block.b.saturating_sub(block.a);
        let end = (start + shorter.len()).min(longer.len());

        let r = ratio(shorter, &longer[start..end]);
        if r > 0.995 {
            return MAX_SCORE;
        }

        best = best.max(r);
    }

    (best * MAX_SCORE as f64).round() as Score
}

/// Share of matched characters in both inputs, in `0.0..=1.0`.
fn ratio(a: &[u8], b: &[u8]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = matching_blocks(a, b).iter().map(|block| block.size).sum();
    2.0 * matched as f64 / total as f64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

/// Non-overlapping common substrings of `a` and `b` in ascending order, found by repeatedly
/// taking the longest common substring and recursing on both sides of it. The list always ends
/// with an empty block at `(a.len(), b.len())`.
fn matching_blocks(a: &[u8], b: &[u8]) -> Vec<Block> {
    let b2j = index_of(b);

    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut blocks = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, b, &b2j, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }

        if alo < block.a && blo < block.b {
            queue.push((alo, block.a, blo, block.b));
        }

        if block.a + block.size < ahi && block.b + block.size < bhi {
            queue.push((block.a + block.size, ahi, block.b + block.size, bhi));
        }

        blocks.push(block);
    }

    blocks.sort();

    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                last.size += block.size;
            }
            _ => merged.push(block),
        }
    }

    merged.push(Block { a: a.len(), b: b.len(), size: 0 });
    merged
}

/// Positions of every byte in `b`. Bytes that make up more than one percent of a long `b`
/// are left out, as they produce many short and meaningless matches.
fn index_of(b: &[u8]) -> HashMap<u8, Vec<usize>> {
    let mut b2j: HashMap<u8, Vec<usize>> = HashMap::new();
    for (j, byte) in b.iter().enumerate() {
        b2j.entry(*byte).or_default().push(j);
    }

    if b.len() >= 200 {
        let limit = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= limit);
    }

    b2j
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`. On ties the block that starts
/// first in `a`, then first in `b`, wins.
fn longest_match(
    a: &[u8],
    b: &[u8],
    b2j: &HashMap<u8, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Block {
    let mut best = Block { a: alo, b: blo, size: 0 };

    // j2len[j] is the length of the match ending at a[i - 1] and b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, byte) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();

        for &j in b2j.get(byte).into_iter().flatten() {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }

            let k = j.checked_sub(1).and_then(|prev| j2len.get(&prev)).copied().unwrap_or(0) + 1;
            next.insert(j, k);

            if k > best.size {
                best = Block { a: i + 1 - k, b: j + 1 - k, size: k };
            }
        }

        j2len = next;
    }

    // bytes dropped from the index can still extend a match on either side
    while best.a > alo && best.b > blo && a[best.a - 1] == b[best.b - 1] {
        best.a -= 1;
        best.b -= 1;
        best.size += 1;
    }

    while best.a + best.size < ahi
        && best.b + best.size < bhi
        && a[best.a + best.size] == b[best.b + best.size]
    {
        best.size += 1;
    }

    best
}
