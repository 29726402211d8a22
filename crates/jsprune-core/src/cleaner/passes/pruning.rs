use crate::ast::visit::{walk_statements_mut, VisitMut};
use crate::ast::{NodeId, Program, Statement};
use rustc_hash::FxHashSet;

/// Remove every statement whose id is in `removals` from its enclosing
/// statement list, at any depth. Returns how many were removed.
pub fn prune_statements(program: &mut Program, removals: &FxHashSet<NodeId>) -> usize {
    let mut pruner = StatementPruner {
        removals,
        removed: 0,
    };
    pruner.visit_program_mut(program);
    pruner.removed
}

struct StatementPruner<'a> {
    removals: &'a FxHashSet<NodeId>,
    removed: usize,
}

impl VisitMut for StatementPruner<'_> {
    fn visit_statements_mut(&mut self, stmts: &mut Vec<Statement>) {
        let before = stmts.len();
        let removals = self.removals;
        stmts.retain(|stmt| !removals.contains(&stmt.id));
        self.removed += before - stmts.len();
        walk_statements_mut(self, stmts);
    }
}
