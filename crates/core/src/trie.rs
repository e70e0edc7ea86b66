//! Character prefix tree over the indexed words.
//!
//! The end of a word is a child edge of its own ([`Edge::End`]) rather than a
//! flag or a reserved character, so `tag` and `tags` are both retrievable and
//! no identifier character can be mistaken for a terminator.

use crate::index::Index;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Edge {
    Char(char),
    End,
}

#[derive(Debug, Clone, Default)]
pub struct Trie {
    children: HashMap<Edge, Trie>,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_index(index: &Index) -> Self {
        Self::from_words(index.words())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    /// Follows existing edges as far as `word` matches, creates a chain for
    /// the rest and marks the end of the word.
    pub fn insert(&mut self, word: &str) {
        let mut node = self;
        for c in word.chars() {
            node = node.children.entry(Edge::Char(c)).or_default();
        }
        node.children.entry(Edge::End).or_default();
    }

    /// The node reached by consuming `prefix`, or `None` when no stored word
    /// starts with it.
    pub fn find(&self, prefix: &str) -> Option<&Trie> {
        let mut node = self;
        for c in prefix.chars() {
            node = node.children.get(&Edge::Char(c))?;
        }
        Some(node)
    }

    /// Whether `word` itself was inserted (not just a longer word).
    pub fn contains(&self, word: &str) -> bool {
        self.find(word)
            .is_some_and(|node| node.children.contains_key(&Edge::End))
    }

    /// Every suffix that completes a stored word from this node. An exact
    /// match yields the empty string. Order is unspecified.
    pub fn prefixes(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut buf = String::new();
        self.collect(&mut buf, &mut words);
        words
    }

    /// Full stored words starting with `prefix`, sorted.
    pub fn completions(&self, prefix: &str) -> Vec<String> {
        let Some(node) = self.find(prefix) else {
            return Vec::new();
        };
        let mut words: Vec<String> = node
            .prefixes()
            .into_iter()
            .map(|suffix| format!("{}{}", prefix, suffix))
            .collect();
        words.sort();
        words
    }

    /// Number of distinct characters that continue from this node.
    #[cfg(test)]
    fn branch_count(&self) -> usize {
        self.children
            .keys()
            .filter(|edge| matches!(edge, Edge::Char(_)))
            .count()
    }

    #[cfg(test)]
    fn has_branch(&self, c: char) -> bool {
        self.children.contains_key(&Edge::Char(c))
    }

    fn collect(&self, buf: &mut String, words: &mut Vec<String>) {
        for (edge, child) in &self.children {
            match edge {
                Edge::End => words.push(buf.clone()),
                Edge::Char(c) => {
                    buf.push(*c);
                    child.collect(buf, words);
                    buf.pop();
                }
            }
        }
    }
}
