use goscope_core::WorkspaceBuilder;
use goscope_core::query::{KindFilter, QueryOptions, RankBy};
use goscope_core::model::ReferenceKind;
use goscope_go::GoIndexer;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const MAIN: &str = r#"package main

func main() {
	cfg := load()
	serve(cfg)
}
"#;

const SERVER: &str = r#"package main

import "fmt"

func load() string {
	return "config"
}

func serve(cfg string) {
	if cfg != "" {
		fmt.Println(cfg)
	}
	serve(cfg)
}
"#;

const BROKEN: &str = r#"package main

func broken( {
	stray := 
"#;

fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
    dir
}

fn build(root: &Path) -> goscope_core::Workspace {
    WorkspaceBuilder::new(root)
        .with_indexer(Arc::new(GoIndexer::new()))
        .build()
        .unwrap()
}

#[test]
fn invalid_file_is_left_out() {
    let dir = project(&[("main.go", MAIN), ("server.go", SERVER), ("broken.go", BROKEN)]);
    let ws = build(dir.path());

    assert_eq!(ws.index().files(), ["main.go", "server.go"]);
    assert!(!ws.index().contains_word("broken"));
    assert!(!ws.index().contains_word("stray"));
    assert!(
        ws.index()
            .references()
            .all(|r| r.location().file != "broken.go")
    );
}

#[test]
fn references_resolve_to_enclosing_functions() {
    let dir = project(&[("main.go", MAIN), ("server.go", SERVER)]);
    let ws = build(dir.path());

    let cfg = ws.index().references_by_word("cfg").unwrap();
    let within: Vec<_> = cfg
        .iter()
        .map(|r| r.location().within.clone().unwrap_or_default())
        .collect();
    assert_eq!(
        within,
        [
            "main (main.go:3)",
            "main (main.go:3)",
            "serve (server.go:9)",
            "serve (server.go:9)",
            "serve (server.go:9)",
            "serve (server.go:9)",
        ]
    );

    let serve = ws.index().function_declarations("serve").unwrap();
    assert_eq!(serve[0].calls, ["Println", "serve"]);
}

#[test]
fn call_graph_stops_at_recursion() {
    let dir = project(&[("main.go", MAIN), ("server.go", SERVER)]);
    let ws = build(dir.path());
    let graph = ws.call_graph().unwrap();

    assert_eq!(graph.root.name, "main (main.go:3)");
    let names: Vec<_> = graph.root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["load (server.go:5)", "serve (server.go:9)"]);

    let serve = &graph.root.children[1];
    assert_eq!(serve.children[0].name, "Println (external)");
    assert_eq!(serve.children[1].name, "serve (server.go:9)");
    assert!(serve.children[1].is_leaf());
    assert_eq!(graph.max_depth(), 2);
}

#[test]
fn prefix_query_over_parsed_project() {
    let dir = project(&[("main.go", MAIN), ("server.go", SERVER)]);
    let ws = build(dir.path());
    let engine = ws.query_engine();

    let opts = QueryOptions::default()
        .with_rank(RankBy::Relevance)
        .with_kind(KindFilter::Only(ReferenceKind::Function));
    let refs = engine.query("se", &opts);
    assert_eq!(refs.len(), 3);
    assert!(refs[0].is_decl());
    assert_eq!(refs[0].name(), "serve");

    let units = engine.search("s", &QueryOptions::default());
    let words: Vec<_> = units.iter().map(|u| u.word.as_str()).collect();
    assert_eq!(words, ["serve"]);
}

#[test]
fn vendor_directories_are_not_indexed() {
    let dir = project(&[
        ("main.go", MAIN),
        ("vendor/lib/lib.go", "package lib\n\nfunc vendored() {}\n"),
    ]);
    let ws = build(dir.path());
    assert!(!ws.index().contains_word("vendored"));
}
