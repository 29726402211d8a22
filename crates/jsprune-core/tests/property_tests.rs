//! Property-based tests for the cleaner
//!
//! Random programs are built from a small statement vocabulary (calls,
//! returns, throws, declarations, blocks, `if`s and nested functions) over a
//! handful of shared names, so references, shadowing and dead code all occur
//! often.

use jsprune_core::ast::visit::{walk_expression, walk_statement, Visit};
use jsprune_core::ast::{Expression, ExpressionKind, NodeId, Statement, StatementKind, VariableKind};
use jsprune_core::cleaner::passes::find_unreachable;
use jsprune_core::{clean, AstBuilder, CleanerConfig, Program};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const NAMES: [&str; 5] = ["a", "b", "c", "f", "g"];

#[derive(Debug, Clone)]
enum Shape {
    Call(usize),
    Return,
    Throw,
    /// `var name = other` or `var name = 0`
    Var(usize, Option<usize>),
    Block(Vec<Shape>),
    /// Literal test when `Some`, otherwise `cond`
    If(Option<bool>, Vec<Shape>, Option<Vec<Shape>>),
    Func(usize, Vec<usize>, Vec<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        (0..NAMES.len()).prop_map(Shape::Call),
        Just(Shape::Return),
        Just(Shape::Throw),
        (0..NAMES.len(), prop::option::of(0..NAMES.len())).prop_map(|(n, r)| Shape::Var(n, r)),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        let list = prop::collection::vec(inner, 0..4);
        prop_oneof![
            list.clone().prop_map(Shape::Block),
            (
                prop::option::of(any::<bool>()),
                list.clone(),
                prop::option::of(list.clone())
            )
                .prop_map(|(test, then, otherwise)| Shape::If(test, then, otherwise)),
            (
                0..NAMES.len(),
                prop::collection::vec(0..NAMES.len(), 0..3),
                list
            )
                .prop_map(|(name, params, body)| Shape::Func(name, params, body)),
        ]
    })
}

fn program_strategy() -> impl Strategy<Value = Program> {
    prop::collection::vec(shape_strategy(), 0..6).prop_map(|shapes| {
        let b = AstBuilder::new();
        Program::new(build_list(&b, &shapes))
    })
}

fn build_list(b: &AstBuilder, shapes: &[Shape]) -> Vec<Statement> {
    shapes.iter().map(|shape| build(b, shape)).collect()
}

fn build(b: &AstBuilder, shape: &Shape) -> Statement {
    match shape {
        Shape::Call(name) => b.expr_stmt(b.call_name(NAMES[*name], vec![])),
        Shape::Return => b.ret(None),
        Shape::Throw => b.throw(b.ident("error")),
        Shape::Var(name, value) => {
            let init = match value {
                Some(other) => b.ident(NAMES[*other]),
                None => b.num(0.0),
            };
            b.var(VariableKind::Var, NAMES[*name], Some(init))
        }
        Shape::Block(body) => b.block(build_list(b, body)),
        Shape::If(test, then, otherwise) => {
            let test = match test {
                Some(value) => b.bool(*value),
                None => b.ident("cond"),
            };
            let then = b.block(build_list(b, then));
            let otherwise = otherwise.as_ref().map(|body| b.block(build_list(b, body)));
            b.if_(test, then, otherwise)
        }
        Shape::Func(name, params, body) => {
            let params: Vec<&str> = params.iter().map(|p| NAMES[*p]).collect();
            b.function_decl(NAMES[*name], &params, build_list(b, body))
        }
    }
}

#[derive(Default)]
struct StatementIds(HashSet<NodeId>);

impl Visit for StatementIds {
    fn visit_statement(&mut self, stmt: &Statement) {
        self.0.insert(stmt.id);
        walk_statement(self, stmt);
    }
}

/// Parameter count of every function, keyed by the node holding it
#[derive(Default)]
struct Arities(HashMap<NodeId, usize>);

impl Visit for Arities {
    fn visit_statement(&mut self, stmt: &Statement) {
        if let StatementKind::Function(func) = &stmt.kind {
            self.0.insert(stmt.id, func.params.len());
        }
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if let ExpressionKind::Function(func) | ExpressionKind::Arrow(func) = &expr.kind {
            self.0.insert(expr.id, func.params.len());
        }
        walk_expression(self, expr);
    }
}

fn reachability_only() -> CleanerConfig {
    CleanerConfig {
        fold_constants: false,
        remove_unused_functions: false,
        remove_unused_variables: false,
        report_unused_parameters: false,
        ..CleanerConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Exactly the statements after a terminator (and what they contain) go
    #[test]
    fn prop_pruning_removes_only_unreachable(program in program_strategy()) {
        let config = reachability_only();
        let report = find_unreachable(&program, config.hoist_function_declarations);
        let mut expected = StatementIds::default();
        expected.visit_program(&program);
        for stmt in &report.statements {
            let mut doomed = StatementIds::default();
            doomed.visit_program(&find_statement(&program, stmt.id));
            for id in doomed.0 {
                expected.0.remove(&id);
            }
        }

        let result = clean(program, &config).unwrap();
        let mut actual = StatementIds::default();
        actual.visit_program(&result.program);
        prop_assert_eq!(actual.0, expected.0);
        prop_assert_eq!(result.diagnostics.len(), report.statements.len());
        prop_assert!(find_unreachable(&result.program, config.hoist_function_declarations).is_empty());
    }

    #[test]
    fn prop_clean_is_idempotent(program in program_strategy()) {
        let config = CleanerConfig::default();
        let first = clean(program, &config).unwrap();
        let second = clean(first.program.clone(), &config).unwrap();
        prop_assert_eq!(&second.program, &first.program);
        prop_assert!(!second.removed_anything());
    }

    #[test]
    fn prop_surviving_functions_keep_their_parameters(program in program_strategy()) {
        let mut before = Arities::default();
        before.visit_program(&program);
        let result = clean(program, &CleanerConfig::default()).unwrap();
        let mut after = Arities::default();
        after.visit_program(&result.program);
        for (id, arity) in after.0 {
            prop_assert_eq!(before.0.get(&id), Some(&arity));
        }
    }
}

/// The statement with `id`, wrapped as a one-statement program
fn find_statement(program: &Program, id: NodeId) -> Program {
    struct Finder {
        id: NodeId,
        found: Option<Statement>,
    }

    impl Visit for Finder {
        fn visit_statement(&mut self, stmt: &Statement) {
            if self.found.is_some() {
                return;
            }
            if stmt.id == self.id {
                self.found = Some(stmt.clone());
                return;
            }
            walk_statement(self, stmt);
        }
    }

    let mut finder = Finder { id, found: None };
    finder.visit_program(program);
    Program::new(finder.found.into_iter().collect())
}
