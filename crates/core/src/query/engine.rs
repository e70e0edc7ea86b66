use super::model::WordMatch;
use super::options::{FileFilter, ListOrder, QueryOptions};
use super::ranking;
use crate::index::Index;
use crate::model::Reference;
use crate::trie::Trie;
use tracing::debug;

/// Answers partial-word queries against a frozen index and its trie.
///
/// A query expands the input through the trie to every indexed word that
/// starts with it, gathers the references of those words, filters, ranks
/// and truncates. Nothing here mutates the index, so an engine can be
/// created per request over shared data.
#[derive(Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a Index,
    trie: &'a Trie,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a Index, trie: &'a Trie) -> Self {
        Self { index, trie }
    }

    /// Full words starting with `input`, sorted, or `None` when the trie has
    /// no such prefix.
    fn expand(&self, input: &str) -> Option<Vec<String>> {
        let node = self.trie.find(input)?;
        let mut words: Vec<String> = node
            .prefixes()
            .into_iter()
            .map(|suffix| format!("{}{}", input, suffix))
            .collect();
        words.sort();
        Some(words)
    }

    /// Raw references for every word starting with `input`.
    pub fn query(&self, input: &str, options: &QueryOptions) -> Vec<&'a Reference> {
        let Some(words) = self.expand(input) else {
            debug!(input, "no indexed word has this prefix");
            return Vec::new();
        };

        let mut refs: Vec<&'a Reference> = words
            .iter()
            .filter_map(|word| self.index.references_by_word(word))
            .flatten()
            .filter(|r| options.accepts(r))
            .collect();

        let index = self.index;
        ranking::sort_references(&mut refs, options.rank_by, |word| index.occurrences(word));
        refs.truncate(options.limit);
        refs
    }

    /// One unit per word starting with `input`. The count and the
    /// representative file only consider references that pass the filters;
    /// words left with none are dropped.
    pub fn search(&self, input: &str, options: &QueryOptions) -> Vec<WordMatch> {
        let Some(words) = self.expand(input) else {
            debug!(input, "no indexed word has this prefix");
            return Vec::new();
        };

        let mut units: Vec<WordMatch> = words
            .into_iter()
            .filter_map(|word| {
                let refs = self.index.references_by_word(&word)?;
                let kept: Vec<&Reference> = refs.into_iter().filter(|r| options.accepts(r)).collect();
                let first = kept.first()?;
                let file = first.location().file.clone();
                Some(WordMatch {
                    count: kept.len(),
                    word,
                    file,
                })
            })
            .collect();

        ranking::sort_word_matches(&mut units, options.rank_by);
        units.truncate(options.limit);
        units
    }

    /// Every occurrence of exactly `word`. `None` means the word is not
    /// indexed; `Some` may still be empty once the file filter is applied.
    pub fn list(
        &self,
        word: &str,
        order: ListOrder,
        files: &FileFilter,
        limit: usize,
    ) -> Option<Vec<&'a Reference>> {
        let mut refs: Vec<&'a Reference> = self
            .index
            .references_by_word(word)?
            .into_iter()
            .filter(|r| files.accepts(r))
            .collect();

        match order {
            ListOrder::Position => refs.sort_by(|a, b| {
                let (la, lb) = (a.location(), b.location());
                la.file.cmp(&lb.file).then(la.line.cmp(&lb.line))
            }),
            ListOrder::Relevance => refs.sort_by(|a, b| ranking::relevance(b, a)),
        }
        refs.truncate(limit);
        Some(refs)
    }

    /// Indexed words starting with `prefix`, for interactive completion.
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut words = self.trie.completions(prefix);
        words.truncate(limit);
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{FileIndex, IndexBuilder};
    use crate::model::{Function, Location, ReferenceKind, Struct, Variable};
    use crate::query::options::{KindFilter, RankBy};

    fn fixture() -> (Index, Trie) {
        let mut file = FileIndex::new("main.go");
        for line in 1..=30 {
            file.push(Variable::new(Location::new("main.go", line), "counter", line == 1));
        }
        file.push(Function::declaration(Location::new("main.go", 40), "count", "", 5));
        file.push(Function::call(Location::new("main.go", 42), "count", ""));
        file.push(Struct::new(Location::new("main.go", 50), "Counter"));

        let mut util = FileIndex::new("pkg/util.go");
        util.push(Variable::new(Location::new("pkg/util.go", 3), "counter", false));

        let mut builder = IndexBuilder::new();
        builder.add_file(file);
        builder.add_file(util);
        let index = builder.finish();
        let trie = Trie::from_index(&index);
        (index, trie)
    }

    #[test]
    fn query_truncates_to_limit() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let opts = QueryOptions::default().with_limit(10);
        assert_eq!(engine.query("count", &opts).len(), 10);
    }

    #[test]
    fn query_filters_by_kind() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let opts = QueryOptions::default().with_kind(KindFilter::Only(ReferenceKind::Function));
        let refs = engine.query("co", &opts);
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.kind() == ReferenceKind::Function));
    }

    #[test]
    fn unknown_prefix_is_empty() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        assert!(engine.query("zz", &QueryOptions::default()).is_empty());
        assert!(engine.search("zz", &QueryOptions::default()).is_empty());
    }

    #[test]
    fn query_is_case_sensitive() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let refs = engine.query("Co", &QueryOptions::default());
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name(), "Counter");
    }

    #[test]
    fn relevance_puts_declarations_first() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let opts = QueryOptions::default().with_rank(RankBy::Relevance);
        let refs = engine.query("count", &opts);
        assert_eq!(refs[0].kind(), ReferenceKind::Function);
        assert!(refs[0].is_decl());
    }

    #[test]
    fn search_groups_by_word() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let units = engine.search("count", &QueryOptions::default().with_rank(RankBy::Count));
        let words: Vec<_> = units.iter().map(|u| (u.word.as_str(), u.count)).collect();
        assert_eq!(words, [("count", 2), ("counter", 31)]);
        assert_eq!(units[1].file, "main.go");
    }

    #[test]
    fn search_counts_only_filtered_references() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let opts = QueryOptions::default().with_file("util.go".parse().unwrap());
        let units = engine.search("count", &opts);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].word, "counter");
        assert_eq!(units[0].count, 1);
        assert_eq!(units[0].file, "pkg/util.go");
    }

    #[test]
    fn list_orders_by_position() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        let refs = engine
            .list("counter", ListOrder::Position, &FileFilter::All, 100)
            .unwrap();
        assert_eq!(refs.len(), 31);
        assert_eq!(refs[0].location().line, 1);
        assert_eq!(refs[29].location().line, 30);
        assert_eq!(refs[30].location().file, "pkg/util.go");

        assert!(engine.list("cou", ListOrder::Position, &FileFilter::All, 10).is_none());
    }

    #[test]
    fn completes_words() {
        let (index, trie) = fixture();
        let engine = QueryEngine::new(&index, &trie);
        assert_eq!(engine.complete("cou", 10), ["count", "counter"]);
        assert_eq!(engine.complete("cou", 1), ["count"]);
    }
}
