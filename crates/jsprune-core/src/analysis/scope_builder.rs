use super::binding_table::{
    BindingTable, DeclarationSite, FunctionInfo, ParamInfo, ScopeId, ScopeKind, SiteKind,
};
use crate::ast::visit::{walk_expression, walk_pattern, walk_property_key, walk_statement, Visit};
use crate::ast::{
    Expression, ExpressionKind, ForHead, ForInit, Function, FunctionBody, NodeId, Pattern,
    PatternKind, Program, Statement, StatementKind, VariableDeclaration, VariableKind,
};
use tracing::trace;

/// Build the scope tree and binding table of `program`.
///
/// References are collected during a single walk and resolved afterwards,
/// so uses of hoisted names that precede their declaration resolve too.
pub fn build_bindings(program: &Program) -> BindingTable {
    let mut builder = ScopeBuilder::new();
    builder.visit_program(program);
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationContext {
    /// Directly in a statement list; the declarator can be deleted
    List,
    /// Sole body of an `if`, loop or label
    Slot,
    LoopHead,
}

struct ScopeBuilder {
    table: BindingTable,
    current: ScopeId,
    references: Vec<(ScopeId, String)>,
    /// Scopes containing a call to a bare `eval`
    eval_scopes: Vec<ScopeId>,
    order: usize,
    /// Set while the statement being visited sits directly in a statement list
    in_list: bool,
}

impl ScopeBuilder {
    fn new() -> Self {
        let mut table = BindingTable::new();
        let root = table.add_scope(ScopeKind::Program, None);
        Self {
            table,
            current: root,
            references: Vec::new(),
            eval_scopes: Vec::new(),
            order: 0,
            in_list: false,
        }
    }

    fn finish(mut self) -> BindingTable {
        for (scope, name) in std::mem::take(&mut self.references) {
            match self.table.lookup(scope, &name) {
                Some(binding) => self.table.mark_referenced(binding),
                None => self.table.mark_unresolved(&name),
            }
        }

        // A direct eval can read any name visible from where it is called
        for scope in std::mem::take(&mut self.eval_scopes) {
            if self.table.lookup(scope, "eval").is_some() {
                continue;
            }
            let visible: Vec<_> = self
                .table
                .scope_chain(scope)
                .into_iter()
                .flat_map(|id| self.table.scope(id).bindings().collect::<Vec<_>>())
                .collect();
            trace!(count = visible.len(), "direct eval pins bindings");
            for binding in visible {
                self.table.mark_referenced(binding);
            }
        }

        self.table
    }

    fn next_order(&mut self) -> usize {
        let order = self.order;
        self.order += 1;
        order
    }

    fn current_kind(&self) -> ScopeKind {
        self.table.scope(self.current).kind
    }

    /// Nearest function or program scope
    fn hoisting_scope(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let scope = self.table.scope(id);
            match scope.parent {
                Some(parent) if !scope.kind.is_hoisting_target() => id = parent,
                _ => return id,
            }
        }
    }

    fn with_scope(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self)) {
        let scope = self.table.add_scope(kind, Some(self.current));
        let outer = std::mem::replace(&mut self.current, scope);
        f(self);
        self.current = outer;
    }

    fn reference(&mut self, name: &str) {
        self.references.push((self.current, name.to_string()));
    }

    fn declare_function(&mut self, stmt: &Statement, func: &Function, in_list: bool) {
        if let Some(name) = &func.name {
            let at_function_level = self.current_kind().is_hoisting_target();
            let site = DeclarationSite {
                node: stmt.id,
                kind: SiteKind::FunctionDeclaration,
                loc: stmt.loc.or(name.loc),
                removable: in_list && at_function_level,
                order: self.next_order(),
            };
            self.table.declare(self.current, &name.name, site);
            if !at_function_level {
                // sloppy-mode scripts also see a block-level function from the
                // enclosing function scope; keep any outer binding alive
                let hoist = self.hoisting_scope();
                self.references.push((hoist, name.name.clone()));
            }
        }
        self.enter_function(stmt.id, func, false);
    }

    fn declare_variables(&mut self, decl: &VariableDeclaration, context: DeclarationContext) {
        let target = match decl.kind {
            VariableKind::Var => self.hoisting_scope(),
            VariableKind::Let | VariableKind::Const => self.current,
        };
        for declarator in &decl.declarations {
            match declarator.simple_name() {
                Some(name) => {
                    let kind = match context {
                        DeclarationContext::LoopHead => SiteKind::LoopHead,
                        _ => SiteKind::Declarator {
                            function_init: declarator.has_function_init(),
                        },
                    };
                    let site = DeclarationSite {
                        node: declarator.id,
                        kind,
                        loc: declarator.loc.or(declarator.pattern.loc),
                        removable: context == DeclarationContext::List,
                        order: self.next_order(),
                    };
                    self.table.declare(target, name, site);
                }
                None => self.declare_pattern(&declarator.pattern, target, SiteKind::Destructured),
            }
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    /// Declare every name bound by `pat`. None of these sites is removable.
    fn declare_pattern(&mut self, pat: &Pattern, scope: ScopeId, kind: SiteKind) {
        match &pat.kind {
            PatternKind::Identifier { name } => {
                let site = DeclarationSite {
                    node: pat.id,
                    kind,
                    loc: pat.loc,
                    removable: false,
                    order: self.next_order(),
                };
                self.table.declare(scope, name, site);
            }
            PatternKind::Object { properties, rest } => {
                for property in properties {
                    walk_property_key(self, &property.key);
                    self.declare_pattern(&property.value, scope, kind);
                }
                if let Some(rest) = rest {
                    self.declare_pattern(rest, scope, kind);
                }
            }
            PatternKind::Array { elements } => {
                for element in elements.iter().flatten() {
                    self.declare_pattern(element, scope, kind);
                }
            }
            PatternKind::Assignment { target, default } => {
                self.declare_pattern(target, scope, kind);
                self.visit_expression(default);
            }
            PatternKind::Rest { argument } => self.declare_pattern(argument, scope, kind),
            PatternKind::Expression { expression } => self.visit_expression(expression),
        }
    }

    fn enter_function(&mut self, owner: NodeId, func: &Function, is_expression: bool) {
        let scope = self.table.add_scope(ScopeKind::Function, Some(self.current));
        let outer = std::mem::replace(&mut self.current, scope);

        if is_expression {
            if let Some(name) = &func.name {
                let site = DeclarationSite {
                    node: owner,
                    kind: SiteKind::FunctionName,
                    loc: name.loc,
                    removable: false,
                    order: self.next_order(),
                };
                self.table.declare(scope, &name.name, site);
            }
        }

        let mut params = Vec::new();
        for param in &func.params {
            match &param.kind {
                PatternKind::Identifier { name } => {
                    let order = self.next_order();
                    let site = DeclarationSite {
                        node: param.id,
                        kind: SiteKind::Parameter,
                        loc: param.loc,
                        removable: false,
                        order,
                    };
                    let binding = self.table.declare(scope, name, site);
                    params.push(ParamInfo {
                        name: name.clone(),
                        binding,
                        loc: param.loc,
                        order,
                    });
                }
                _ => self.declare_pattern(param, scope, SiteKind::Parameter),
            }
        }
        self.table.add_function(FunctionInfo {
            name: func.name().map(str::to_string),
            scope,
            params,
        });

        match &func.body {
            FunctionBody::Block(block) => self.visit_statements(&block.body),
            FunctionBody::Expression(expr) => self.visit_expression(expr),
        }
        self.current = outer;
    }
}

impl Visit for ScopeBuilder {
    fn visit_statements(&mut self, stmts: &[Statement]) {
        for stmt in stmts {
            self.in_list = true;
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        let in_list = std::mem::replace(&mut self.in_list, false);
        match &stmt.kind {
            StatementKind::Function(func) => self.declare_function(stmt, func, in_list),
            StatementKind::Variable(decl) => {
                let context = if in_list {
                    DeclarationContext::List
                } else {
                    DeclarationContext::Slot
                };
                self.declare_variables(decl, context);
            }
            StatementKind::Block(block) => {
                self.with_scope(ScopeKind::Block, |this| this.visit_statements(&block.body))
            }
            StatementKind::Switch(switch) => {
                self.visit_expression(&switch.discriminant);
                self.with_scope(ScopeKind::Block, |this| {
                    for case in &switch.cases {
                        this.visit_switch_case(case);
                    }
                });
            }
            StatementKind::For(for_stmt) => self.with_scope(ScopeKind::Block, |this| {
                match &for_stmt.init {
                    Some(ForInit::Variable(decl)) => {
                        this.declare_variables(decl, DeclarationContext::LoopHead)
                    }
                    Some(ForInit::Expression(expr)) => this.visit_expression(expr),
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    this.visit_expression(test);
                }
                if let Some(update) = &for_stmt.update {
                    this.visit_expression(update);
                }
                this.visit_statement(&for_stmt.body);
            }),
            StatementKind::ForIn(for_in) | StatementKind::ForOf(for_in) => {
                self.with_scope(ScopeKind::Block, |this| {
                    match &for_in.left {
                        ForHead::Variable(decl) => {
                            this.declare_variables(decl, DeclarationContext::LoopHead)
                        }
                        ForHead::Pattern(pat) => this.visit_pattern(pat),
                    }
                    this.visit_expression(&for_in.right);
                    this.visit_statement(&for_in.body);
                })
            }
            StatementKind::Try(try_stmt) => {
                self.with_scope(ScopeKind::Block, |this| {
                    this.visit_statements(&try_stmt.block.body)
                });
                if let Some(handler) = &try_stmt.handler {
                    self.with_scope(ScopeKind::Catch, |this| {
                        if let Some(param) = &handler.param {
                            let scope = this.current;
                            this.declare_pattern(param, scope, SiteKind::CatchParameter);
                        }
                        this.visit_statements(&handler.body.body);
                    });
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.with_scope(ScopeKind::Block, |this| {
                        this.visit_statements(&finalizer.body)
                    });
                }
            }
            _ => walk_statement(self, stmt),
        }
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match &expr.kind {
            ExpressionKind::Identifier { name } => self.reference(name),
            ExpressionKind::Function(func) => self.enter_function(expr.id, func, true),
            ExpressionKind::Arrow(func) => self.enter_function(expr.id, func, false),
            ExpressionKind::Call { callee, .. } => {
                if callee.as_identifier() == Some("eval") {
                    self.eval_scopes.push(self.current);
                }
                walk_expression(self, expr);
            }
            _ => walk_expression(self, expr),
        }
    }

    /// Patterns reached through the walk are assignment targets; writes
    /// count as references
    fn visit_pattern(&mut self, pat: &Pattern) {
        match &pat.kind {
            PatternKind::Identifier { name } => self.reference(name),
            _ => walk_pattern(self, pat),
        }
    }
}
