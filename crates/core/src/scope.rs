//! Lexical scope assignment.
//!
//! Runs once after every file is merged: each reference is matched against
//! every declared function body (a plain cross product), which records the
//! enclosing function on the reference and the callee on the function.
//! Bodies are assumed not to overlap; if two do, both receive the call and
//! the later declaration wins `within`.

use crate::index::{Index, RefId};
use crate::model::Reference;
use std::time::Instant;
use tracing::info;

pub(crate) fn resolve(index: &mut Index) {
    let start = Instant::now();
    let declarations: Vec<(RefId, String)> = index
        .declaration_ids()
        .into_iter()
        .filter_map(|id| index.reference(id).as_function().map(|f| (id, f.info())))
        .collect();

    let mut calls = 0usize;
    for id in 0..index.len() {
        let (location, callee) = {
            let reference = index.reference(id);
            let callee = match reference {
                Reference::Function(f) if !f.is_decl => Some(f.name.clone()),
                _ => None,
            };
            (reference.location().clone(), callee)
        };

        for (decl_id, info) in &declarations {
            let wraps = index
                .reference(*decl_id)
                .as_function()
                .is_some_and(|f| f.wraps(&location));
            if !wraps {
                continue;
            }

            index.reference_mut(id).location_mut().within = Some(info.clone());

            if let Some(name) = &callee {
                if let Reference::Function(decl) = index.reference_mut(*decl_id) {
                    decl.calls.push(name.clone());
                    calls += 1;
                }
            }
        }
    }

    info!(
        references = index.len(),
        functions = declarations.len(),
        calls,
        "scope resolution finished in {:?}",
        start.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use crate::index::{FileIndex, IndexBuilder};
    use crate::model::{Function, Location, Variable};

    fn build(files: Vec<FileIndex>) -> crate::Index {
        let mut builder = IndexBuilder::new();
        for f in files {
            builder.add_file(f);
        }
        builder.finish()
    }

    #[test]
    fn usages_get_enclosing_function() {
        let mut f = FileIndex::new("main.go");
        f.push(Function::declaration(Location::new("main.go", 3), "main", "", 4));
        f.push(Variable::new(Location::new("main.go", 4), "x", true));
        f.push(Function::call(Location::new("main.go", 5), "helper", ""));
        f.push(Variable::new(Location::new("main.go", 9), "global", true));
        let index = build(vec![f]);

        let x = &index.references_by_word("x").unwrap()[0];
        assert_eq!(x.location().within.as_deref(), Some("main (main.go:3)"));

        let global = &index.references_by_word("global").unwrap()[0];
        assert_eq!(global.location().within, None);

        let main = index.function_declarations("main").unwrap()[0];
        assert_eq!(main.calls, vec!["helper".to_string()]);
    }

    #[test]
    fn calls_resolve_against_later_declarations() {
        let mut a = FileIndex::new("a.go");
        a.push(Function::declaration(Location::new("a.go", 1), "main", "", 3));
        a.push(Function::call(Location::new("a.go", 2), "later", ""));
        a.push(Function::call(Location::new("a.go", 3), "later", ""));
        let mut b = FileIndex::new("b.go");
        b.push(Function::declaration(Location::new("b.go", 1), "later", "", 1));
        let index = build(vec![a, b]);

        let main = index.function_declarations("main").unwrap()[0];
        assert_eq!(main.calls, vec!["later".to_string(), "later".to_string()]);
        let later = index.function_declarations("later").unwrap()[0];
        assert!(later.calls.is_empty());
    }

    #[test]
    fn declarations_are_not_calls() {
        let mut f = FileIndex::new("main.go");
        f.push(Function::declaration(Location::new("main.go", 1), "outer", "", 10));
        f.push(Function::declaration(Location::new("main.go", 2), "inner", "", 1));
        let index = build(vec![f]);

        let outer = index.function_declarations("outer").unwrap()[0];
        assert!(outer.calls.is_empty());
    }

    #[test]
    fn overlapping_bodies_both_collect_the_call() {
        let mut f = FileIndex::new("main.go");
        f.push(Function::declaration(Location::new("main.go", 1), "outer", "", 10));
        f.push(Function::declaration(Location::new("main.go", 4), "inner", "", 2));
        f.push(Function::call(Location::new("main.go", 5), "work", ""));
        let index = build(vec![f]);

        assert_eq!(index.function_declarations("outer").unwrap()[0].calls, ["work"]);
        assert_eq!(index.function_declarations("inner").unwrap()[0].calls, ["work"]);
        let call = index
            .references_by_word("work")
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(call.location().within.as_deref(), Some("inner (main.go:4)"));
    }
}
