use super::Index;
use crate::callgraph::CallStackRoot;
use crate::model::{Function, Reference};
use serde::{Deserialize, Serialize};

const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Aggregate statistics over an index and, when present, its call graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub file_count: usize,
    pub files: Vec<String>,
    #[serde(rename = "uniq_word_count")]
    pub unique_word_count: usize,
    #[serde(rename = "func_count")]
    pub function_count: usize,
    pub most_common_words: Vec<WordCount>,
    pub most_common_vars: Vec<WordCount>,
    pub most_common_funcs: Vec<WordCount>,
    #[serde(rename = "avg_func_len")]
    pub avg_function_len: usize,
    #[serde(rename = "largest_func")]
    pub largest_function: Option<Function>,
    pub avg_call_depth: usize,
    pub max_call_depth: usize,
}

impl Summary {
    pub fn from_index(index: &Index, call_graph: Option<&CallStackRoot>) -> Self {
        let mut words = Vec::with_capacity(index.word_count());
        let mut vars = Vec::new();
        let mut funcs = Vec::new();
        let mut size_total = 0usize;
        let mut declared = 0usize;
        let mut largest: Option<&Function> = None;

        for (word, ids) in &index.words {
            let mut var_decls = 0;
            let mut fn_decls = 0;
            for &id in ids {
                match index.reference(id) {
                    Reference::Variable(v) if v.is_decl => var_decls += 1,
                    Reference::Function(f) if f.is_decl => {
                        fn_decls += 1;
                        size_total += f.size;
                        declared += 1;
                        if largest.is_none_or(|l| f.size > l.size) {
                            largest = Some(f);
                        }
                    }
                    _ => {}
                }
            }

            words.push(WordCount {
                word: word.clone(),
                count: ids.len(),
            });
            if var_decls > 0 {
                vars.push(WordCount {
                    word: word.clone(),
                    count: var_decls,
                });
            }
            if fn_decls > 0 {
                funcs.push(WordCount {
                    word: word.clone(),
                    count: fn_decls,
                });
            }
        }

        Self {
            file_count: index.files().len(),
            files: index.files().to_vec(),
            unique_word_count: index.word_count(),
            function_count: index.function_name_count(),
            most_common_words: top(words),
            most_common_vars: top(vars),
            most_common_funcs: top(funcs),
            avg_function_len: if declared == 0 { 0 } else { size_total / declared },
            largest_function: largest.cloned(),
            avg_call_depth: call_graph.map_or(0, CallStackRoot::average_leaf_depth),
            max_call_depth: call_graph.map_or(0, CallStackRoot::max_depth),
        }
    }
}

fn top(mut counts: Vec<WordCount>) -> Vec<WordCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    counts.truncate(TOP_N);
    counts
}

impl Index {
    /// Statistics without call depths.
    pub fn summary(&self) -> Summary {
        Summary::from_index(self, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callgraph::build_call_graph;
    use crate::index::{FileIndex, IndexBuilder};
    use crate::model::{Location, Variable};

    fn build() -> Index {
        let mut f = FileIndex::new("main.go");
        f.push(Function::declaration(Location::new("main.go", 1), "main", "", 10));
        f.push(Function::call(Location::new("main.go", 2), "helper", ""));
        f.push(Variable::new(Location::new("main.go", 3), "err", true));
        f.push(Variable::new(Location::new("main.go", 4), "err", false));
        f.push(Variable::new(Location::new("main.go", 5), "err", false));
        f.push(Function::declaration(Location::new("main.go", 20), "helper", "", 4));
        let mut builder = IndexBuilder::new();
        builder.add_file(f);
        builder.finish()
    }

    #[test]
    fn counts_words_and_declarations() {
        let index = build();
        let summary = index.summary();

        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.unique_word_count, 3);
        assert_eq!(summary.function_count, 2);
        assert_eq!(
            summary.most_common_words[0],
            WordCount {
                word: "err".to_string(),
                count: 3
            }
        );
        // ties on count fall back to the word
        assert_eq!(summary.most_common_words[1].word, "helper");
        assert_eq!(summary.most_common_vars.len(), 1);
        assert_eq!(summary.most_common_vars[0].count, 1);
        assert_eq!(summary.most_common_funcs.len(), 2);
        assert_eq!(summary.avg_function_len, 7);
        assert_eq!(summary.largest_function.as_ref().map(|f| f.name.as_str()), Some("main"));
        assert_eq!(summary.max_call_depth, 0);
    }

    #[test]
    fn includes_call_depths() {
        let index = build();
        let graph = build_call_graph(&index).unwrap();
        let summary = Summary::from_index(&index, Some(&graph));
        assert_eq!(summary.max_call_depth, 1);
        assert_eq!(summary.avg_call_depth, 1);
    }

    #[test]
    fn function_count_ignores_call_only_names() {
        let mut f = FileIndex::new("main.go");
        f.push(Function::declaration(Location::new("main.go", 1), "main", "", 4));
        f.push(Function::call(Location::new("main.go", 2), "Println", "fmt"));
        f.push(Function::call(Location::new("main.go", 3), "run", ""));
        f.push(Function::declaration(Location::new("main.go", 8), "run", "", 2));
        f.push(Function::declaration(Location::new("main.go", 12), "run", "Server", 2));
        let mut builder = IndexBuilder::new();
        builder.add_file(f);
        let summary = builder.finish().summary();

        assert_eq!(summary.function_count, 2);
        assert_eq!(summary.most_common_funcs[0].word, "run");
        assert_eq!(summary.most_common_funcs[0].count, 2);
    }

    #[test]
    fn empty_index() {
        let summary = IndexBuilder::new().finish().summary();
        assert_eq!(summary.avg_function_len, 0);
        assert!(summary.largest_function.is_none());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["largest_func"].is_null());
        assert_eq!(json["uniq_word_count"], 0);
        assert_eq!(json["most_common_words"], serde_json::json!([]));
    }
}
