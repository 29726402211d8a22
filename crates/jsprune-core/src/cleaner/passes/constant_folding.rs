use crate::ast::visit::{walk_statement_mut, VisitMut};
use crate::ast::{
    Block, Literal, NodeId, NodeIdGen, Program, Statement, StatementKind, SwitchCase, SwitchStatement,
};
use crate::cleaner::{CleanPass, PassContext};
use crate::config::CleanerConfig;
use crate::errors::{CleanError, Result};
use tracing::debug;

/// Rewrites `if` statements with a boolean literal test and `switch`
/// statements over a string or number literal.
///
/// Folding is top-down: a statement is refolded until it is stable before
/// its children are visited, so `if (true) if (false) a();` collapses in one
/// run. Function bodies anywhere in the tree are folded too.
pub struct ConstantFoldingPass;

impl CleanPass for ConstantFoldingPass {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn is_enabled(&self, config: &CleanerConfig) -> bool {
        config.fold_constants
    }

    fn run(&mut self, program: &mut Program, ctx: &mut PassContext) -> Result<bool> {
        let mut folder = Folder {
            ids: &mut ctx.ids,
            folds: 0,
            ids_exhausted: false,
        };
        folder.visit_program_mut(program);
        if folder.ids_exhausted {
            return Err(CleanError::NodeIdOverflow);
        }
        Ok(folder.folds > 0)
    }
}

enum Folded {
    Unchanged(Statement),
    Replaced(Statement),
    Deleted,
}

struct Folder<'a> {
    ids: &'a mut NodeIdGen,
    folds: usize,
    ids_exhausted: bool,
}

impl Folder<'_> {
    /// A fresh id, or `replaced` (the id of the node being dropped) once the
    /// generator has run dry; the pass then fails as a whole
    fn fresh_id(&mut self, replaced: NodeId) -> NodeId {
        match self.ids.next_id() {
            Some(id) => id,
            None => {
                self.ids_exhausted = true;
                replaced
            }
        }
    }

    fn fold_until_stable(&mut self, mut stmt: Statement) -> Option<Statement> {
        loop {
            match self.fold_root(stmt) {
                Folded::Unchanged(stmt) => return Some(stmt),
                Folded::Replaced(next) => {
                    self.folds += 1;
                    stmt = next;
                }
                Folded::Deleted => {
                    self.folds += 1;
                    return None;
                }
            }
        }
    }

    fn fold_root(&mut self, stmt: Statement) -> Folded {
        let Statement { id, loc, kind } = stmt;
        match kind {
            StatementKind::If(if_stmt) => match if_stmt.test.as_boolean_literal() {
                Some(true) => {
                    debug!(%id, "folded if (true)");
                    Folded::Replaced(*if_stmt.consequent)
                }
                Some(false) => {
                    debug!(%id, "folded if (false)");
                    match if_stmt.alternate {
                        Some(alternate) => Folded::Replaced(*alternate),
                        None => Folded::Deleted,
                    }
                }
                None => Folded::Unchanged(Statement {
                    id,
                    loc,
                    kind: StatementKind::If(if_stmt),
                }),
            },
            StatementKind::Switch(switch) => match select_switch_body(&switch) {
                SwitchFold::Keep => Folded::Unchanged(Statement {
                    id,
                    loc,
                    kind: StatementKind::Switch(switch),
                }),
                SwitchFold::Body(start) => {
                    debug!(%id, "folded switch over a literal");
                    let body = collect_case_statements(switch.cases, start);
                    if body.is_empty() {
                        Folded::Deleted
                    } else {
                        Folded::Replaced(Statement {
                            id: self.fresh_id(id),
                            loc,
                            kind: StatementKind::Block(Block::new(body)),
                        })
                    }
                }
                SwitchFold::Nothing => {
                    debug!(%id, "removed switch with no matching case");
                    Folded::Deleted
                }
            },
            kind => Folded::Unchanged(Statement { id, loc, kind }),
        }
    }

    /// Fold the `else` branch without leaving an empty statement behind
    fn fold_alternate(&mut self, stmt: &mut Statement) {
        if let StatementKind::If(if_stmt) = &mut stmt.kind {
            if let Some(alternate) = if_stmt.alternate.take() {
                if_stmt.alternate = self.fold_until_stable(*alternate).map(Box::new);
            }
        }
    }
}

impl VisitMut for Folder<'_> {
    fn visit_statements_mut(&mut self, stmts: &mut Vec<Statement>) {
        for stmt in std::mem::take(stmts) {
            if let Some(mut stmt) = self.fold_until_stable(stmt) {
                self.fold_alternate(&mut stmt);
                walk_statement_mut(self, &mut stmt);
                stmts.push(stmt);
            }
        }
    }

    /// Single-statement slots: an `if` body, a loop body, a labeled body
    fn visit_statement_mut(&mut self, stmt: &mut Statement) {
        let placeholder = Statement::new(stmt.id, StatementKind::Empty);
        let taken = std::mem::replace(stmt, placeholder);
        let (taken_id, loc) = (taken.id, taken.loc);
        match self.fold_until_stable(taken) {
            Some(folded) => *stmt = folded,
            None => {
                // the slot must still hold a statement
                *stmt = Statement {
                    id: self.fresh_id(taken_id),
                    loc,
                    kind: StatementKind::Empty,
                };
            }
        }
        self.fold_alternate(stmt);
        walk_statement_mut(self, stmt);
    }
}

enum SwitchFold {
    Keep,
    /// Run cases from this index on
    Body(usize),
    /// No case matches and there is no `default`
    Nothing,
}

fn select_switch_body(switch: &SwitchStatement) -> SwitchFold {
    let discriminant = match switch.discriminant.as_literal() {
        Some(lit) if matches!(lit, Literal::String(_) | Literal::Number(_)) => lit,
        _ => return SwitchFold::Keep,
    };

    let mut selected = None;
    for (index, case) in switch.cases.iter().enumerate() {
        let Some(test) = &case.test else {
            continue;
        };
        match test.as_literal() {
            Some(value) if value.strict_equals(discriminant) => {
                selected = Some(index);
                break;
            }
            Some(_) => {}
            // a computed test might match first, or have side effects
            None => return SwitchFold::Keep,
        }
    }

    let start = match selected.or_else(|| switch.cases.iter().position(|c| c.test.is_none())) {
        Some(start) => start,
        None => return SwitchFold::Nothing,
    };

    let body_len = case_run_len(&switch.cases[start..]);
    let escapes = switch.cases[start..]
        .iter()
        .flat_map(|case| case.consequent.iter())
        .take(body_len)
        .any(contains_switch_break);
    if escapes {
        return SwitchFold::Keep;
    }
    SwitchFold::Body(start)
}

/// Number of statements executed from the first of `cases` until a
/// top-level `break`
fn case_run_len(cases: &[SwitchCase]) -> usize {
    let mut count = 0;
    for case in cases {
        for stmt in &case.consequent {
            if is_plain_break(stmt) {
                return count;
            }
            count += 1;
        }
    }
    count
}

fn collect_case_statements(cases: Vec<SwitchCase>, start: usize) -> Vec<Statement> {
    let mut body = Vec::new();
    for case in cases.into_iter().skip(start) {
        for stmt in case.consequent {
            if is_plain_break(&stmt) {
                return body;
            }
            body.push(stmt);
        }
    }
    body
}

fn is_plain_break(stmt: &Statement) -> bool {
    matches!(stmt.kind, StatementKind::Break { label: None })
}

/// An unlabeled `break` nested in `stmt` that would target the enclosing
/// switch; loops, inner switches and functions capture their own
fn contains_switch_break(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Break { label: None } => true,
        StatementKind::Block(block) => block.body.iter().any(contains_switch_break),
        StatementKind::If(if_stmt) => {
            contains_switch_break(&if_stmt.consequent)
                || if_stmt
                    .alternate
                    .as_deref()
                    .is_some_and(contains_switch_break)
        }
        StatementKind::Try(try_stmt) => {
            try_stmt.block.body.iter().any(contains_switch_break)
                || try_stmt
                    .handler
                    .as_ref()
                    .is_some_and(|h| h.body.body.iter().any(contains_switch_break))
                || try_stmt
                    .finalizer
                    .as_ref()
                    .is_some_and(|f| f.body.iter().any(contains_switch_break))
        }
        StatementKind::Labeled(labeled) => contains_switch_break(&labeled.body),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBuilder;
    use crate::printer::print_compact;

    fn fold(program: &mut Program, ids: NodeIdGen) -> bool {
        let config = CleanerConfig::default();
        let mut ctx = PassContext::new(&config, ids);
        ConstantFoldingPass.run(program, &mut ctx).unwrap()
    }

    fn fold_new(program: &mut Program, b: &AstBuilder) -> bool {
        fold(program, NodeIdGen::after(b.id()).unwrap())
    }

    #[test]
    fn test_if_true_takes_then_branch() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.if_(
            b.bool(true),
            b.block(vec![b.expr_stmt(b.call_name("a", vec![]))]),
            Some(b.expr_stmt(b.call_name("c", vec![]))),
        )]);
        assert!(fold_new(&mut program, &b));
        assert_eq!(print_compact(&program), "{ a(); }");
    }

    #[test]
    fn test_if_false_without_else_is_deleted() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.if_(b.bool(false), b.expr_stmt(b.call_name("a", vec![])), None),
            b.expr_stmt(b.call_name("b", vec![])),
        ]);
        assert!(fold_new(&mut program, &b));
        assert_eq!(print_compact(&program), "b();");
    }

    #[test]
    fn test_nested_folds_collapse_in_one_run() {
        let b = AstBuilder::new();
        let inner = b.if_(
            b.bool(false),
            b.expr_stmt(b.call_name("a", vec![])),
            Some(b.expr_stmt(b.call_name("b", vec![]))),
        );
        let mut program = Program::new(vec![b.if_(b.bool(true), inner, None)]);
        fold_new(&mut program, &b);
        assert_eq!(print_compact(&program), "b();");
    }

    #[test]
    fn test_deleted_slot_becomes_empty_statement() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.while_(
            b.ident("running"),
            b.if_(b.bool(false), b.expr_stmt(b.call_name("a", vec![])), None),
        )]);
        fold_new(&mut program, &b);
        assert_eq!(print_compact(&program), "while (running) ;");
    }

    #[test]
    fn test_dead_else_branch_is_dropped() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.if_(
            b.ident("x"),
            b.block(vec![]),
            Some(b.if_(b.bool(false), b.expr_stmt(b.call_name("a", vec![])), None)),
        )]);
        fold_new(&mut program, &b);
        assert_eq!(print_compact(&program), "if (x) {}");
    }

    #[test]
    fn test_switch_fall_through() {
        let b = AstBuilder::new();
        let call = |name: &str| b.expr_stmt(b.call_name(name, vec![]));
        let mut program = Program::new(vec![b.switch(
            b.num(2.0),
            vec![
                b.case(Some(b.num(1.0)), vec![call("x")]),
                b.case(Some(b.num(2.0)), vec![call("y")]),
                b.case(Some(b.num(3.0)), vec![call("z"), b.brk()]),
                b.case(Some(b.num(4.0)), vec![call("w")]),
            ],
        )]);
        assert!(fold_new(&mut program, &b));
        assert_eq!(print_compact(&program), "{ y(); z(); }");
    }

    #[test]
    fn test_switch_fold_fails_when_ids_run_out() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.num(1.0),
            vec![b.case(Some(b.num(1.0)), vec![b.expr_stmt(b.call_name("x", vec![]))])],
        )]);
        let mut ids = NodeIdGen::after(NodeId(u32::MAX - 1)).unwrap();
        assert_eq!(ids.next_id(), Some(NodeId(u32::MAX)));

        let config = CleanerConfig::default();
        let mut ctx = PassContext::new(&config, ids);
        assert!(matches!(
            ConstantFoldingPass.run(&mut program, &mut ctx),
            Err(CleanError::NodeIdOverflow)
        ));
    }

    #[test]
    fn test_switch_falls_back_to_default() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.str("b"),
            vec![
                b.case(Some(b.str("a")), vec![b.expr_stmt(b.call_name("x", vec![])), b.brk()]),
                b.case(None, vec![b.expr_stmt(b.call_name("d", vec![]))]),
            ],
        )]);
        fold_new(&mut program, &b);
        assert_eq!(print_compact(&program), "{ d(); }");
    }

    #[test]
    fn test_switch_without_match_is_deleted() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.num(9.0),
            vec![b.case(Some(b.num(1.0)), vec![b.expr_stmt(b.call_name("x", vec![]))])],
        )]);
        fold_new(&mut program, &b);
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_switch_with_computed_case_is_kept() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.num(1.0),
            vec![
                b.case(Some(b.ident("k")), vec![b.brk()]),
                b.case(Some(b.num(1.0)), vec![b.expr_stmt(b.call_name("x", vec![]))]),
            ],
        )]);
        assert!(!fold_new(&mut program, &b));
    }

    #[test]
    fn test_switch_with_nested_break_is_kept() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.num(1.0),
            vec![b.case(
                Some(b.num(1.0)),
                vec![
                    b.if_(b.ident("done"), b.brk(), None),
                    b.expr_stmt(b.call_name("x", vec![])),
                ],
            )],
        )]);
        assert!(!fold_new(&mut program, &b));
    }

    #[test]
    fn test_boolean_discriminant_is_not_folded() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![b.switch(
            b.bool(true),
            vec![b.case(Some(b.bool(true)), vec![b.expr_stmt(b.call_name("x", vec![]))])],
        )]);
        assert!(!fold_new(&mut program, &b));
    }

    #[test]
    fn test_folds_inside_function_expressions() {
        let b = AstBuilder::new();
        let callback = b.arrow(
            &[],
            vec![b.if_(b.bool(false), b.expr_stmt(b.call_name("a", vec![])), None)],
        );
        let mut program = Program::new(vec![b.expr_stmt(b.call_name("run", vec![callback]))]);
        assert!(fold_new(&mut program, &b));
        assert_eq!(print_compact(&program), "run(() => {});");
    }
}
