//! Static call tree rooted at the program entry function.
//!
//! Expansion follows each declaration's `calls` list. A callee with no
//! declaration becomes an `external` leaf; a callee already on the current
//! path becomes a leaf that is not expanded, which bounds recursive and
//! mutually recursive chains. Names with several declarations always expand
//! to the first one.

use crate::error::Result;
use crate::index::Index;
use crate::model::Function;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Go programs start executing at `func main()`.
pub const ENTRY_FUNCTION: &str = "main";

/// Resolves a function name to the declaration used for expansion.
pub trait FunctionLookup {
    fn first_declaration(&self, name: &str) -> Option<&Function>;
}

impl FunctionLookup for Index {
    fn first_declaration(&self, name: &str) -> Option<&Function> {
        self.function_declarations(name)
            .and_then(|decls| decls.into_iter().next())
    }
}

impl FunctionLookup for HashMap<String, Vec<Function>> {
    fn first_declaration(&self, name: &str) -> Option<&Function> {
        self.get(name).and_then(|decls| decls.first())
    }
}

/// Document written to disk: `{"downward": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStackRoot {
    #[serde(rename = "downward")]
    pub root: CallStack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStack {
    pub name: String,
    pub depth: usize,
    pub children: Vec<CallStack>,
}

impl CallStack {
    fn leaf(name: String, depth: usize) -> Self {
        Self {
            name,
            depth,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal.
    pub fn walk(&self, visit: &mut impl FnMut(&CallStack)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

impl CallStackRoot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn max_depth(&self) -> usize {
        let mut max = 0;
        self.root.walk(&mut |node| max = max.max(node.depth));
        max
    }

    /// Mean depth of the leaves, i.e. of every complete call chain.
    pub fn average_leaf_depth(&self) -> usize {
        let (mut total, mut leaves) = (0usize, 0usize);
        self.root.walk(&mut |node| {
            if node.is_leaf() {
                total += node.depth;
                leaves += 1;
            }
        });
        if leaves == 0 { 0 } else { total / leaves }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.walk(&mut |_| count += 1);
        count
    }

    /// Indented text rendering, one node per line.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.root.walk(&mut |node| {
            out.push_str(&"  ".repeat(node.depth));
            out.push_str(&node.name);
            out.push('\n');
        });
        out
    }
}

/// Builds the call tree from [`ENTRY_FUNCTION`], or `None` when the project
/// declares no such function.
pub fn build_call_graph<F: FunctionLookup + ?Sized>(functions: &F) -> Option<CallStackRoot> {
    build_call_graph_from(functions, ENTRY_FUNCTION)
}

pub fn build_call_graph_from<F: FunctionLookup + ?Sized>(
    functions: &F,
    entry: &str,
) -> Option<CallStackRoot> {
    let entry = functions.first_declaration(entry)?;
    let mut seen = HashSet::new();
    Some(CallStackRoot {
        root: expand(functions, entry, &mut seen, 0),
    })
}

fn expand<F: FunctionLookup + ?Sized>(
    functions: &F,
    function: &Function,
    seen: &mut HashSet<String>,
    depth: usize,
) -> CallStack {
    let info = function.info();
    seen.insert(info.clone());

    let mut children = Vec::with_capacity(function.calls.len());
    for callee in &function.calls {
        let Some(decl) = functions.first_declaration(callee) else {
            children.push(CallStack::leaf(format!("{} (external)", callee), depth + 1));
            continue;
        };

        let callee_info = decl.info();
        if seen.contains(&callee_info) {
            children.push(CallStack::leaf(callee_info, depth + 1));
            continue;
        }

        children.push(expand(functions, decl, seen, depth + 1));
    }

    // Only the current path counts as seen; siblings may expand the same
    // function again.
    seen.remove(&info);

    CallStack {
        name: info,
        depth,
        children,
    }
}
