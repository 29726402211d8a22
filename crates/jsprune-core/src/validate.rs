//! Structural checks run before any pass touches the tree.
//!
//! Every removal is keyed on [`NodeId`], so ids must be unique; and jump
//! statements must have a target, otherwise reachability has no meaning.

use crate::ast::visit::{
    walk_declarator, walk_expression, walk_function, walk_pattern, walk_statement,
    walk_switch_case, Visit,
};
use crate::ast::{
    Expression, Function, NodeId, NodeIdGen, Pattern, Program, Statement, StatementKind,
    SwitchCase, VariableDeclarator,
};
use crate::errors::{CleanError, Result};
use rustc_hash::FxHashSet;

/// Validate `program` and return an id generator that allocates after the
/// highest id present
pub fn validate(program: &Program) -> Result<NodeIdGen> {
    let mut validator = Validator::default();
    validator.visit_program(program);
    if let Some(err) = validator.error {
        return Err(err);
    }
    match validator.max_id {
        Some(max) => NodeIdGen::after(max).ok_or(CleanError::NodeIdOverflow),
        None => Ok(NodeIdGen::new()),
    }
}

#[derive(Default)]
struct JumpContext {
    loop_depth: usize,
    switch_depth: usize,
    /// Enclosing labels, innermost last; the flag is set for labeled loops
    labels: Vec<(String, bool)>,
}

#[derive(Default)]
struct Validator {
    seen: FxHashSet<NodeId>,
    max_id: Option<NodeId>,
    context: JumpContext,
    error: Option<CleanError>,
}

impl Validator {
    fn record(&mut self, id: NodeId) {
        if !self.seen.insert(id) {
            self.fail(CleanError::DuplicateNodeId { id });
        }
        if self.max_id.map_or(true, |max| id > max) {
            self.max_id = Some(id);
        }
    }

    fn fail(&mut self, err: CleanError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn check_jump(&mut self, stmt: &Statement) {
        let (keyword, label) = match &stmt.kind {
            StatementKind::Break { label } => ("break", label),
            StatementKind::Continue { label } => ("continue", label),
            _ => return,
        };
        let is_continue = keyword == "continue";

        if let Some(label) = label {
            let target = self
                .context
                .labels
                .iter()
                .rev()
                .find(|(name, _)| *name == label.name);
            match target {
                None => self.fail(CleanError::UnknownLabel {
                    label: label.name.clone(),
                    position: stmt.loc,
                }),
                Some((_, labels_loop)) if is_continue && !*labels_loop => {
                    self.fail(CleanError::OrphanedJump {
                        keyword,
                        expected: "a labeled loop",
                        position: stmt.loc,
                    })
                }
                Some(_) => {}
            }
            return;
        }

        if is_continue && self.context.loop_depth == 0 {
            self.fail(CleanError::OrphanedJump {
                keyword,
                expected: "a loop",
                position: stmt.loc,
            });
        } else if !is_continue && self.context.loop_depth == 0 && self.context.switch_depth == 0 {
            self.fail(CleanError::OrphanedJump {
                keyword,
                expected: "a loop or switch",
                position: stmt.loc,
            });
        }
    }
}

fn is_loop(stmt: &Statement) -> bool {
    matches!(
        stmt.kind,
        StatementKind::While(_)
            | StatementKind::DoWhile(_)
            | StatementKind::For(_)
            | StatementKind::ForIn(_)
            | StatementKind::ForOf(_)
    )
}

impl Visit for Validator {
    fn visit_statement(&mut self, stmt: &Statement) {
        self.record(stmt.id);
        match &stmt.kind {
            StatementKind::Break { .. } | StatementKind::Continue { .. } => self.check_jump(stmt),
            StatementKind::Switch(_) => {
                self.context.switch_depth += 1;
                walk_statement(self, stmt);
                self.context.switch_depth -= 1;
            }
            StatementKind::Labeled(labeled) => {
                self.context
                    .labels
                    .push((labeled.label.name.clone(), is_loop(&labeled.body)));
                walk_statement(self, stmt);
                self.context.labels.pop();
            }
            _ if is_loop(stmt) => {
                self.context.loop_depth += 1;
                walk_statement(self, stmt);
                self.context.loop_depth -= 1;
            }
            _ => walk_statement(self, stmt),
        }
    }

    fn visit_switch_case(&mut self, case: &SwitchCase) {
        self.record(case.id);
        walk_switch_case(self, case);
    }

    fn visit_declarator(&mut self, decl: &VariableDeclarator) {
        self.record(decl.id);
        walk_declarator(self, decl);
    }

    fn visit_function(&mut self, func: &Function) {
        // jumps never cross a function boundary
        let outer = std::mem::take(&mut self.context);
        walk_function(self, func);
        self.context = outer;
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.record(expr.id);
        walk_expression(self, expr);
    }

    fn visit_pattern(&mut self, pat: &Pattern) {
        self.record(pat.id);
        walk_pattern(self, pat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, VariableKind};

    #[test]
    fn test_valid_program_yields_fresh_ids() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.var(VariableKind::Let, "x", Some(b.num(1.0)))]);
        let next_unused = b.id();
        let mut ids = validate(&program).unwrap();
        assert_eq!(ids.next_id(), Some(next_unused));
    }

    #[test]
    fn test_highest_possible_id_is_rejected() {
        let program = Program::new(vec![Statement::new(NodeId(u32::MAX), StatementKind::Empty)]);
        assert!(matches!(
            validate(&program).unwrap_err(),
            CleanError::NodeIdOverflow
        ));

        let program = Program::new(vec![Statement::new(NodeId(u32::MAX - 1), StatementKind::Empty)]);
        assert!(validate(&program).is_ok());
    }

    #[test]
    fn test_duplicate_node_id() {
        let b = AstBuilder::new();
        let stmt = b.expr_stmt(b.call_name("f", vec![]));
        let program = Program::new(vec![stmt.clone(), stmt]);
        let err = validate(&program).unwrap_err();
        assert!(matches!(err, CleanError::DuplicateNodeId { .. }));
    }

    #[test]
    fn test_break_outside_loop() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.brk().with_loc(3, 4)]);
        let err = validate(&program).unwrap_err();
        assert_eq!(err.to_string(), "'break' outside of a loop or switch at 3:4");
    }

    #[test]
    fn test_continue_inside_switch_only() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.switch(
            b.ident("x"),
            vec![b.case(Some(b.num(1.0)), vec![b.cont()])],
        )]);
        assert!(matches!(
            validate(&program).unwrap_err(),
            CleanError::OrphanedJump { keyword: "continue", .. }
        ));
    }

    #[test]
    fn test_break_does_not_cross_function_boundary() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.while_(
            b.bool(true),
            b.block(vec![b.function_decl("f", &[], vec![b.brk()])]),
        )]);
        assert!(validate(&program).is_err());
    }

    #[test]
    fn test_labels() {
        let b = AstBuilder::new();
        let ok = Program::new(vec![b.labeled(
            "outer",
            b.while_(b.bool(true), b.block(vec![b.brk_label("outer")])),
        )]);
        assert!(validate(&ok).is_ok());

        let unknown = Program::new(vec![b.while_(b.bool(true), b.brk_label("nowhere"))]);
        assert!(matches!(
            validate(&unknown).unwrap_err(),
            CleanError::UnknownLabel { .. }
        ));
    }
}
