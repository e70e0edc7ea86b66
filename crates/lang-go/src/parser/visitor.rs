//! Single pass over a Go syntax tree, dispatching on node kind.
//!
//! | node                               | emitted                                  |
//! |------------------------------------|------------------------------------------|
//! | `if` condition, `for` condition    | variable uses for contained identifiers  |
//! | `for k, v := range` / `= range`    | variable declarations / uses             |
//! | `a, b := ...`                      | variable declarations                    |
//! | `f(x)`, `recv.M(x)`                | function call, plus uses in arguments    |
//! | `func` / method declaration        | function declaration, parameter decls    |
//! | `var` declaration                  | one variable declaration per name        |
//! | `type` declaration                 | one struct entry per named type          |
//!
//! Whether a `:=` target is a declaration depends on the lexical block it
//! appears in, which [`ScopeStack`] tracks while walking.

use super::scope::ScopeStack;
use goscope_core::FileIndex;
use goscope_core::model::{Function, Location, Struct, Variable};
use tree_sitter::Node;

const BLANK: &str = "_";

pub(crate) struct GoVisitor<'a> {
    file: &'a str,
    source: &'a [u8],
    scopes: ScopeStack,
    out: FileIndex,
}

impl<'a> GoVisitor<'a> {
    pub fn new(file: &'a str, source: &'a [u8]) -> Self {
        Self {
            file,
            source,
            scopes: ScopeStack::new(),
            out: FileIndex::new(file),
        }
    }

    pub fn run(mut self, root: Node) -> FileIndex {
        self.visit(root);
        self.out
    }

    fn visit(&mut self, node: Node) {
        match node.kind() {
            "function_declaration" | "method_declaration" => self.visit_function(node),
            "func_literal" => self.visit_func_literal(node),
            "call_expression" => self.visit_call(node),
            "short_var_declaration" => self.visit_short_var(node),
            "var_declaration" | "var_spec_list" => self.visit_children(node),
            "var_spec" => self.visit_var_spec(node),
            "type_declaration" => self.visit_type_declaration(node),
            "if_statement" => self.visit_if(node),
            "for_statement" => self.visit_for(node),
            "for_clause" => self.visit_for_clause(node),
            "range_clause" => self.visit_range(node),
            "block"
            | "expression_switch_statement"
            | "type_switch_statement"
            | "select_statement"
            | "expression_case"
            | "type_case"
            | "default_case"
            | "communication_case" => {
                self.scopes.push();
                self.visit_children(node);
                self.scopes.pop();
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn visit_function(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            self.visit_children(node);
            return;
        };
        let body = node.child_by_field_name("body");
        // lines from the opening brace to the closing one
        let size = body.map_or(0, |b| {
            b.end_position().row.saturating_sub(b.start_position().row)
        });
        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|r| self.receiver_type(r))
            .unwrap_or_default();

        self.out.push(Function::declaration(
            self.location(name_node),
            self.text(name_node),
            receiver,
            size,
        ));

        self.scopes.push();
        for field in ["receiver", "parameters", "result"] {
            if let Some(list) = node.child_by_field_name(field) {
                self.declare_parameters(list, true);
            }
        }
        if let Some(body) = body {
            // the body shares the parameters' block
            self.visit_children(body);
        }
        self.scopes.pop();
    }

    fn visit_func_literal(&mut self, node: Node) {
        self.scopes.push();
        for field in ["parameters", "result"] {
            if let Some(list) = node.child_by_field_name(field) {
                self.declare_parameters(list, false);
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit_children(body);
        }
        self.scopes.pop();
    }

    /// Binds the names of a parameter list, emitting a declaration for each
    /// when `emit` is set. Unnamed parameters and plain result types bind
    /// nothing.
    fn declare_parameters(&mut self, list: Node, emit: bool) {
        if list.kind() != "parameter_list" {
            return;
        }
        let mut cursor = list.walk();
        let params: Vec<Node> = list.named_children(&mut cursor).collect();
        for param in params {
            if !matches!(
                param.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            ) {
                continue;
            }
            let mut names_cursor = param.walk();
            let names: Vec<Node> = param
                .children_by_field_name("name", &mut names_cursor)
                .collect();
            for name in names {
                let text = self.text(name);
                if text == BLANK {
                    continue;
                }
                self.scopes.bind(&text);
                if emit {
                    self.out.push(Variable::new(self.location(name), text, true));
                }
            }
        }
    }

    /// Receiver type name with pointer and type arguments stripped:
    /// `(s *Server)` and `(s Stack[T])` give `Server` and `Stack`.
    fn receiver_type(&self, receiver: Node) -> Option<String> {
        let mut cursor = receiver.walk();
        let param = receiver
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")?;
        let ty = param.child_by_field_name("type")?;
        let text = self.text(ty);
        let name = text.trim_start_matches('*').trim();
        let name = name.split('[').next().unwrap_or(name);
        Some(name.trim().to_string())
    }

    fn visit_call(&mut self, node: Node) {
        if let Some(function) = node.child_by_field_name("function") {
            match function.kind() {
                "identifier" => {
                    self.out
                        .push(Function::call(self.location(function), self.text(function), ""));
                }
                "selector_expression" => {
                    if let Some(field) = function.child_by_field_name("field") {
                        let receiver = function
                            .child_by_field_name("operand")
                            .and_then(|operand| self.base_identifier(operand))
                            .unwrap_or_default();
                        self.out
                            .push(Function::call(self.location(field), self.text(field), receiver));
                    }
                }
                _ => {}
            }
        }

        if let Some(args) = node.child_by_field_name("arguments") {
            let mut cursor = args.walk();
            let args: Vec<Node> = args.named_children(&mut cursor).collect();
            for arg in args {
                self.record_uses(arg);
            }
        }

        self.visit_children(node);
    }

    /// Leftmost identifier of a selector chain: `a` for `a.b.c` and
    /// `a.b().c`.
    fn base_identifier(&self, mut node: Node) -> Option<String> {
        loop {
            node = match node.kind() {
                "identifier" => return Some(self.text(node)),
                "selector_expression" | "index_expression" | "type_assertion_expression" => {
                    node.child_by_field_name("operand")?
                }
                "call_expression" => node.child_by_field_name("function")?,
                "parenthesized_expression" => node.named_child(0)?,
                _ => return None,
            };
        }
    }

    fn visit_short_var(&mut self, node: Node) {
        if let Some(left) = node.child_by_field_name("left") {
            for name in self.identifiers_in_list(left) {
                let text = self.text(name);
                let is_decl = self.scopes.bind(&text);
                self.out.push(Variable::new(self.location(name), text, is_decl));
            }
        }
        if let Some(right) = node.child_by_field_name("right") {
            self.visit(right);
        }
    }

    fn visit_var_spec(&mut self, node: Node) {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            let text = self.text(name);
            if text == BLANK {
                continue;
            }
            self.scopes.bind(&text);
            self.out.push(Variable::new(self.location(name), text, true));
        }
        if let Some(value) = node.child_by_field_name("value") {
            self.visit(value);
        }
    }

    fn visit_type_declaration(&mut self, node: Node) {
        let mut cursor = node.walk();
        let specs: Vec<Node> = node.named_children(&mut cursor).collect();
        for spec in specs {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            if let Some(name) = spec.child_by_field_name("name") {
                self.out.push(Struct::new(self.location(name), self.text(name)));
            }
            self.visit_children(spec);
        }
    }

    fn visit_if(&mut self, node: Node) {
        let condition = node.child_by_field_name("condition");
        self.scopes.push();
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            if Some(child) == condition {
                self.record_uses(child);
            }
            self.visit(child);
        }
        self.scopes.pop();
    }

    fn visit_for(&mut self, node: Node) {
        self.scopes.push();
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "for_clause" | "range_clause" | "block" | "comment" => {}
                // `for cond { ... }`
                _ => self.record_uses(child),
            }
            self.visit(child);
        }
        self.scopes.pop();
    }

    fn visit_for_clause(&mut self, node: Node) {
        let condition = node.child_by_field_name("condition");
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            if Some(child) == condition {
                self.record_uses(child);
            }
            self.visit(child);
        }
    }

    fn visit_range(&mut self, node: Node) {
        let mut cursor = node.walk();
        let defines = node.children(&mut cursor).any(|c| c.kind() == ":=");

        if let Some(left) = node.child_by_field_name("left") {
            for name in self.identifiers_in_list(left) {
                let text = self.text(name);
                let is_decl = defines && self.scopes.bind(&text);
                self.out.push(Variable::new(self.location(name), text, is_decl));
            }
        }
        if let Some(right) = node.child_by_field_name("right") {
            self.visit(right);
        }
    }

    /// Non-blank identifiers that are direct elements of an expression list.
    fn identifiers_in_list<'t>(&self, list: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = list.walk();
        let candidates: Vec<Node<'t>> = if list.kind() == "expression_list" {
            list.named_children(&mut cursor).collect()
        } else {
            vec![list]
        };
        candidates
            .into_iter()
            .filter(|n| n.kind() == "identifier" && self.text(*n) != BLANK)
            .collect()
    }

    /// Records every identifier under `node` as a variable use. Nested calls
    /// and function literals are left to their own visit.
    fn record_uses(&mut self, node: Node) {
        match node.kind() {
            "identifier" => {
                let text = self.text(node);
                if text != BLANK {
                    self.out.push(Variable::new(self.location(node), text, false));
                }
            }
            "call_expression" | "func_literal" => {}
            // `T{Name: v}`: the key is usually a field name, not a variable
            "keyed_element" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.record_uses(value);
                }
            }
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.record_uses(child);
                }
            }
        }
    }

    fn location(&self, node: Node) -> Location {
        Location::new(self.file, node.start_position().row + 1)
    }

    fn text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }
}
