use super::pruning::prune_statements;
use crate::ast::visit::Visit;
use crate::ast::{IfStatement, NodeId, Program, Statement, StatementKind};
use crate::cleaner::{CleanPass, PassContext};
use crate::config::CleanerConfig;
use crate::diagnostics::Diagnostic;
use crate::errors::Result;
use crate::printer::statement_snippet;
use crate::span::Position;
use rustc_hash::FxHashSet;
use tracing::debug;

/// A statement that can never execute
#[derive(Debug, Clone, PartialEq)]
pub struct UnreachableStatement {
    pub id: NodeId,
    pub loc: Option<Position>,
    pub snippet: String,
}

/// Unreachable statements of a whole program, in walk order
#[derive(Debug, Clone, Default)]
pub struct ReachabilityReport {
    pub ids: FxHashSet<NodeId>,
    pub statements: Vec<UnreachableStatement>,
}

impl ReachabilityReport {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Classify every statement list in `program`.
///
/// Within a list, everything after the first terminator is unreachable and
/// is not looked into further. Reachable statements are descended into:
/// blocks, branches, loop bodies, `try` parts, labeled bodies, switch cases
/// and every function body, each function body being its own list.
pub fn find_unreachable(program: &Program, hoist_function_declarations: bool) -> ReachabilityReport {
    let mut analyzer = ReachabilityAnalyzer {
        hoist_function_declarations,
        report: ReachabilityReport::default(),
    };
    analyzer.visit_program(program);
    analyzer.report
}

/// `return`, `throw`, or an `if` that terminates on every path
pub fn is_terminator(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Return { .. } | StatementKind::Throw { .. } => true,
        StatementKind::If(if_stmt) => if_terminates(if_stmt),
        _ => false,
    }
}

/// A literal-true test only needs its `then` branch to terminate; otherwise
/// both branches must, and an `if` without `else` never does
pub fn if_terminates(if_stmt: &IfStatement) -> bool {
    if if_stmt.test.as_boolean_literal() == Some(true) {
        return branch_terminates(&if_stmt.consequent);
    }
    match &if_stmt.alternate {
        Some(alternate) => {
            branch_terminates(&if_stmt.consequent) && branch_terminates(alternate)
        }
        None => false,
    }
}

fn branch_terminates(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Block(block) => block.body.iter().any(is_terminator),
        _ => is_terminator(stmt),
    }
}

struct ReachabilityAnalyzer {
    hoist_function_declarations: bool,
    report: ReachabilityReport,
}

impl ReachabilityAnalyzer {
    fn is_hoisted(&self, stmt: &Statement) -> bool {
        self.hoist_function_declarations && matches!(stmt.kind, StatementKind::Function(_))
    }
}

impl Visit for ReachabilityAnalyzer {
    fn visit_statements(&mut self, stmts: &[Statement]) {
        let mut terminated = false;
        for stmt in stmts {
            if terminated && !self.is_hoisted(stmt) {
                debug!(id = %stmt.id, "unreachable statement");
                self.report.ids.insert(stmt.id);
                self.report.statements.push(UnreachableStatement {
                    id: stmt.id,
                    loc: stmt.loc,
                    snippet: statement_snippet(stmt),
                });
                continue;
            }
            self.visit_statement(stmt);
            terminated |= is_terminator(stmt);
        }
    }
}

/// Removes statements after terminators, repeating until a scan finds
/// nothing, and reports each as `unreachable-statement`
pub struct ReachabilityPass;

impl CleanPass for ReachabilityPass {
    fn name(&self) -> &'static str {
        "unreachable-code"
    }

    fn is_enabled(&self, config: &CleanerConfig) -> bool {
        config.remove_unreachable
    }

    fn run(&mut self, program: &mut Program, ctx: &mut PassContext) -> Result<bool> {
        let mut changed = false;
        loop {
            let report = find_unreachable(program, ctx.config.hoist_function_declarations);
            if report.is_empty() {
                break;
            }
            prune_statements(program, &report.ids);
            ctx.diagnostics.extend(
                report
                    .statements
                    .into_iter()
                    .map(|stmt| Diagnostic::unreachable(stmt.loc, stmt.snippet)),
            );
            changed = true;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, NodeIdGen};
    use crate::printer::print_compact;

    fn call(b: &AstBuilder, name: &str) -> Statement {
        b.expr_stmt(b.call_name(name, vec![]))
    }

    #[test]
    fn test_statements_after_return_are_unreachable() {
        let b = AstBuilder::new();
        let dead = call(&b, "dead");
        let dead_id = dead.id;
        let program = Program::new(vec![b.function_decl(
            "f",
            &[],
            vec![b.ret(Some(b.num(1.0))), dead],
        )]);
        let report = find_unreachable(&program, true);
        assert_eq!(report.statements.len(), 1);
        assert_eq!(report.statements[0].id, dead_id);
        assert_eq!(report.statements[0].snippet, "dead();");
    }

    #[test]
    fn test_if_without_else_is_not_a_terminator() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.if_(b.ident("c"), b.block(vec![b.ret(None)]), None),
            call(&b, "live"),
        ]);
        assert!(find_unreachable(&program, true).is_empty());
    }

    #[test]
    fn test_if_with_both_branches_terminating() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.if_(
                b.ident("c"),
                b.block(vec![b.ret(None)]),
                Some(b.throw(b.ident("e"))),
            ),
            call(&b, "dead"),
        ]);
        assert_eq!(find_unreachable(&program, true).statements.len(), 1);
    }

    #[test]
    fn test_literal_true_needs_only_then_branch() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.if_(b.bool(true), b.block(vec![b.ret(None)]), None),
            call(&b, "dead"),
        ]);
        assert_eq!(find_unreachable(&program, true).statements.len(), 1);
    }

    #[test]
    fn test_nested_block_return_counts_for_that_block_only() {
        let b = AstBuilder::new();
        let inner_dead = call(&b, "inner_dead");
        let inner_dead_id = inner_dead.id;
        let program = Program::new(vec![
            b.block(vec![b.ret(None), inner_dead]),
            call(&b, "outer_live"),
        ]);
        let report = find_unreachable(&program, true);
        assert_eq!(report.statements.len(), 1);
        assert!(report.ids.contains(&inner_dead_id));
    }

    #[test]
    fn test_function_after_return_is_kept_only_when_hoisting() {
        let b = AstBuilder::new();
        let body = vec![
            b.ret(Some(b.call_name("helper", vec![]))),
            b.function_decl("helper", &[], vec![]),
        ];
        let program = Program::new(vec![b.function_decl("f", &[], body)]);
        assert_eq!(find_unreachable(&program, false).statements.len(), 1);
        assert!(find_unreachable(&program, true).is_empty());
    }

    #[test]
    fn test_loop_and_callback_bodies_are_analyzed() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.while_(b.ident("x"), b.block(vec![b.brk(), call(&b, "a")])),
            b.expr_stmt(b.call_name(
                "on",
                vec![b.arrow(&[], vec![b.ret(None), call(&b, "b")])],
            )),
        ]);
        // `break` is not a terminator for the enclosing list
        assert_eq!(find_unreachable(&program, true).statements.len(), 1);
    }

    #[test]
    fn test_pass_prunes_and_reports() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.function_decl(
            "f",
            &[],
            vec![
                b.ret(Some(b.num(1.0))),
                b.expr_stmt(b.console_log(vec![b.str("dead")])).with_loc(3, 2),
            ],
        )]);
        let config = CleanerConfig::default();
        let mut ctx = PassContext::new(&config, NodeIdGen::after(b.id()).unwrap());
        assert!(ReachabilityPass.run(&mut program, &mut ctx).unwrap());
        assert_eq!(print_compact(&program), "function f() { return 1; }");
        assert_eq!(ctx.diagnostics.len(), 1);
        assert_eq!(ctx.diagnostics[0].line, Some(3));
        assert_eq!(ctx.diagnostics[0].snippet.as_deref(), Some(r#"console.log("dead");"#));
    }
}
