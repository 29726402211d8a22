//! Tree walkers.
//!
//! [`Visit`] is the read-only traversal used by the analyses; [`VisitMut`] is
//! the owning traversal used when removal sets are applied. Every hook
//! defaults to the matching `walk_*` function, so an implementation only
//! overrides the nodes it cares about and calls back into `walk_*` to keep
//! descending.

use super::{
    ArrayElement, Expression, ExpressionKind, ForHead, ForInit, Function, FunctionBody,
    MemberProperty, ObjectMember, Pattern, PatternKind, Program, PropertyKey, Statement,
    StatementKind, SwitchCase, VariableDeclaration, VariableDeclarator,
};

pub trait Visit {
    fn visit_program(&mut self, program: &Program) {
        self.visit_statements(&program.body);
    }

    fn visit_statements(&mut self, stmts: &[Statement]) {
        walk_statements(self, stmts);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_switch_case(&mut self, case: &SwitchCase) {
        walk_switch_case(self, case);
    }

    fn visit_declarator(&mut self, decl: &VariableDeclarator) {
        walk_declarator(self, decl);
    }

    fn visit_function(&mut self, func: &Function) {
        walk_function(self, func);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_pattern(&mut self, pat: &Pattern) {
        walk_pattern(self, pat);
    }
}

pub fn walk_statements<V: Visit + ?Sized>(v: &mut V, stmts: &[Statement]) {
    for stmt in stmts {
        v.visit_statement(stmt);
    }
}

pub fn walk_statement<V: Visit + ?Sized>(v: &mut V, stmt: &Statement) {
    match &stmt.kind {
        StatementKind::Expression { expression } => v.visit_expression(expression),
        StatementKind::Block(block) => v.visit_statements(&block.body),
        StatementKind::Empty | StatementKind::Break { .. } | StatementKind::Continue { .. } => {}
        StatementKind::If(if_stmt) => {
            v.visit_expression(&if_stmt.test);
            v.visit_statement(&if_stmt.consequent);
            if let Some(alternate) = &if_stmt.alternate {
                v.visit_statement(alternate);
            }
        }
        StatementKind::Switch(switch) => {
            v.visit_expression(&switch.discriminant);
            for case in &switch.cases {
                v.visit_switch_case(case);
            }
        }
        StatementKind::Return { argument } => {
            if let Some(argument) = argument {
                v.visit_expression(argument);
            }
        }
        StatementKind::Throw { argument } => v.visit_expression(argument),
        StatementKind::Variable(decl) => walk_variable_declaration(v, decl),
        StatementKind::Function(func) => v.visit_function(func),
        StatementKind::While(while_stmt) => {
            v.visit_expression(&while_stmt.test);
            v.visit_statement(&while_stmt.body);
        }
        StatementKind::DoWhile(while_stmt) => {
            v.visit_statement(&while_stmt.body);
            v.visit_expression(&while_stmt.test);
        }
        StatementKind::For(for_stmt) => {
            match &for_stmt.init {
                Some(ForInit::Variable(decl)) => walk_variable_declaration(v, decl),
                Some(ForInit::Expression(expr)) => v.visit_expression(expr),
                None => {}
            }
            if let Some(test) = &for_stmt.test {
                v.visit_expression(test);
            }
            if let Some(update) = &for_stmt.update {
                v.visit_expression(update);
            }
            v.visit_statement(&for_stmt.body);
        }
        StatementKind::ForIn(for_in) | StatementKind::ForOf(for_in) => {
            match &for_in.left {
                ForHead::Variable(decl) => walk_variable_declaration(v, decl),
                ForHead::Pattern(pat) => v.visit_pattern(pat),
            }
            v.visit_expression(&for_in.right);
            v.visit_statement(&for_in.body);
        }
        StatementKind::Try(try_stmt) => {
            v.visit_statements(&try_stmt.block.body);
            if let Some(handler) = &try_stmt.handler {
                if let Some(param) = &handler.param {
                    v.visit_pattern(param);
                }
                v.visit_statements(&handler.body.body);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                v.visit_statements(&finalizer.body);
            }
        }
        StatementKind::Labeled(labeled) => v.visit_statement(&labeled.body),
    }
}

pub fn walk_variable_declaration<V: Visit + ?Sized>(v: &mut V, decl: &VariableDeclaration) {
    for declarator in &decl.declarations {
        v.visit_declarator(declarator);
    }
}

pub fn walk_declarator<V: Visit + ?Sized>(v: &mut V, decl: &VariableDeclarator) {
    v.visit_pattern(&decl.pattern);
    if let Some(init) = &decl.init {
        v.visit_expression(init);
    }
}

pub fn walk_switch_case<V: Visit + ?Sized>(v: &mut V, case: &SwitchCase) {
    if let Some(test) = &case.test {
        v.visit_expression(test);
    }
    v.visit_statements(&case.consequent);
}

pub fn walk_function<V: Visit + ?Sized>(v: &mut V, func: &Function) {
    for param in &func.params {
        v.visit_pattern(param);
    }
    match &func.body {
        FunctionBody::Block(block) => v.visit_statements(&block.body),
        FunctionBody::Expression(expr) => v.visit_expression(expr),
    }
}

pub fn walk_expression<V: Visit + ?Sized>(v: &mut V, expr: &Expression) {
    match &expr.kind {
        ExpressionKind::Identifier { .. } | ExpressionKind::Literal { .. } | ExpressionKind::This => {}
        ExpressionKind::Array { elements } => {
            for element in elements {
                match element {
                    ArrayElement::Expression(e) | ArrayElement::Spread(e) => v.visit_expression(e),
                    ArrayElement::Hole => {}
                }
            }
        }
        ExpressionKind::Object { properties } => {
            for member in properties {
                match member {
                    ObjectMember::Property { key, value, .. } => {
                        walk_property_key(v, key);
                        v.visit_expression(value);
                    }
                    ObjectMember::Spread { argument } => v.visit_expression(argument),
                }
            }
        }
        ExpressionKind::Function(func) | ExpressionKind::Arrow(func) => v.visit_function(func),
        ExpressionKind::Unary { argument, .. } | ExpressionKind::Update { argument, .. } => {
            v.visit_expression(argument)
        }
        ExpressionKind::Binary { left, right, .. } | ExpressionKind::Logical { left, right, .. } => {
            v.visit_expression(left);
            v.visit_expression(right);
        }
        ExpressionKind::Assignment { left, right, .. } => {
            v.visit_pattern(left);
            v.visit_expression(right);
        }
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expression(test);
            v.visit_expression(consequent);
            v.visit_expression(alternate);
        }
        ExpressionKind::Call { callee, arguments } | ExpressionKind::New { callee, arguments } => {
            v.visit_expression(callee);
            for argument in arguments {
                v.visit_expression(&argument.value);
            }
        }
        ExpressionKind::Member { object, property } => {
            v.visit_expression(object);
            if let MemberProperty::Computed(property) = property {
                v.visit_expression(property);
            }
        }
        ExpressionKind::Sequence { expressions } | ExpressionKind::Template { expressions, .. } => {
            for e in expressions {
                v.visit_expression(e);
            }
        }
    }
}

pub fn walk_property_key<V: Visit + ?Sized>(v: &mut V, key: &PropertyKey) {
    if let PropertyKey::Computed(expr) = key {
        v.visit_expression(expr);
    }
}

pub fn walk_pattern<V: Visit + ?Sized>(v: &mut V, pat: &Pattern) {
    match &pat.kind {
        PatternKind::Identifier { .. } => {}
        PatternKind::Object { properties, rest } => {
            for property in properties {
                walk_property_key(v, &property.key);
                v.visit_pattern(&property.value);
            }
            if let Some(rest) = rest {
                v.visit_pattern(rest);
            }
        }
        PatternKind::Array { elements } => {
            for element in elements.iter().flatten() {
                v.visit_pattern(element);
            }
        }
        PatternKind::Assignment { target, default } => {
            v.visit_pattern(target);
            v.visit_expression(default);
        }
        PatternKind::Rest { argument } => v.visit_pattern(argument),
        PatternKind::Expression { expression } => v.visit_expression(expression),
    }
}

/// Owning counterpart of [`Visit`]. Only statement containers and the paths
/// leading to them are exposed; leaf expressions are never rewritten.
pub trait VisitMut {
    fn visit_program_mut(&mut self, program: &mut Program) {
        self.visit_statements_mut(&mut program.body);
    }

    fn visit_statements_mut(&mut self, stmts: &mut Vec<Statement>) {
        walk_statements_mut(self, stmts);
    }

    fn visit_statement_mut(&mut self, stmt: &mut Statement) {
        walk_statement_mut(self, stmt);
    }

    fn visit_function_mut(&mut self, func: &mut Function) {
        walk_function_mut(self, func);
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

pub fn walk_statements_mut<V: VisitMut + ?Sized>(v: &mut V, stmts: &mut Vec<Statement>) {
    for stmt in stmts.iter_mut() {
        v.visit_statement_mut(stmt);
    }
}

pub fn walk_statement_mut<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Statement) {
    match &mut stmt.kind {
        StatementKind::Expression { expression } => v.visit_expression_mut(expression),
        StatementKind::Block(block) => v.visit_statements_mut(&mut block.body),
        StatementKind::Empty | StatementKind::Break { .. } | StatementKind::Continue { .. } => {}
        StatementKind::If(if_stmt) => {
            v.visit_expression_mut(&mut if_stmt.test);
            v.visit_statement_mut(&mut if_stmt.consequent);
            if let Some(alternate) = &mut if_stmt.alternate {
                v.visit_statement_mut(alternate);
            }
        }
        StatementKind::Switch(switch) => {
            v.visit_expression_mut(&mut switch.discriminant);
            for case in &mut switch.cases {
                if let Some(test) = &mut case.test {
                    v.visit_expression_mut(test);
                }
                v.visit_statements_mut(&mut case.consequent);
            }
        }
        StatementKind::Return { argument } => {
            if let Some(argument) = argument {
                v.visit_expression_mut(argument);
            }
        }
        StatementKind::Throw { argument } => v.visit_expression_mut(argument),
        StatementKind::Variable(decl) => walk_variable_declaration_mut(v, decl),
        StatementKind::Function(func) => v.visit_function_mut(func),
        StatementKind::While(while_stmt) | StatementKind::DoWhile(while_stmt) => {
            v.visit_expression_mut(&mut while_stmt.test);
            v.visit_statement_mut(&mut while_stmt.body);
        }
        StatementKind::For(for_stmt) => {
            match &mut for_stmt.init {
                Some(ForInit::Variable(decl)) => walk_variable_declaration_mut(v, decl),
                Some(ForInit::Expression(expr)) => v.visit_expression_mut(expr),
                None => {}
            }
            if let Some(test) = &mut for_stmt.test {
                v.visit_expression_mut(test);
            }
            if let Some(update) = &mut for_stmt.update {
                v.visit_expression_mut(update);
            }
            v.visit_statement_mut(&mut for_stmt.body);
        }
        StatementKind::ForIn(for_in) | StatementKind::ForOf(for_in) => {
            match &mut for_in.left {
                ForHead::Variable(decl) => walk_variable_declaration_mut(v, decl),
                ForHead::Pattern(pat) => walk_pattern_mut(v, pat),
            }
            v.visit_expression_mut(&mut for_in.right);
            v.visit_statement_mut(&mut for_in.body);
        }
        StatementKind::Try(try_stmt) => {
            v.visit_statements_mut(&mut try_stmt.block.body);
            if let Some(handler) = &mut try_stmt.handler {
                if let Some(param) = &mut handler.param {
                    walk_pattern_mut(v, param);
                }
                v.visit_statements_mut(&mut handler.body.body);
            }
            if let Some(finalizer) = &mut try_stmt.finalizer {
                v.visit_statements_mut(&mut finalizer.body);
            }
        }
        StatementKind::Labeled(labeled) => v.visit_statement_mut(&mut labeled.body),
    }
}

fn walk_variable_declaration_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut VariableDeclaration) {
    for declarator in &mut decl.declarations {
        walk_pattern_mut(v, &mut declarator.pattern);
        if let Some(init) = &mut declarator.init {
            v.visit_expression_mut(init);
        }
    }
}

pub fn walk_function_mut<V: VisitMut + ?Sized>(v: &mut V, func: &mut Function) {
    for param in &mut func.params {
        walk_pattern_mut(v, param);
    }
    match &mut func.body {
        FunctionBody::Block(block) => v.visit_statements_mut(&mut block.body),
        FunctionBody::Expression(expr) => v.visit_expression_mut(expr),
    }
}

/// Descends into sub-expressions only to reach nested function bodies.
pub fn walk_expression_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expression) {
    match &mut expr.kind {
        ExpressionKind::Identifier { .. } | ExpressionKind::Literal { .. } | ExpressionKind::This => {}
        ExpressionKind::Array { elements } => {
            for element in elements {
                match element {
                    ArrayElement::Expression(e) | ArrayElement::Spread(e) => {
                        v.visit_expression_mut(e)
                    }
                    ArrayElement::Hole => {}
                }
            }
        }
        ExpressionKind::Object { properties } => {
            for member in properties {
                match member {
                    ObjectMember::Property { key, value, .. } => {
                        if let PropertyKey::Computed(key) = key {
                            v.visit_expression_mut(key);
                        }
                        v.visit_expression_mut(value);
                    }
                    ObjectMember::Spread { argument } => v.visit_expression_mut(argument),
                }
            }
        }
        ExpressionKind::Function(func) | ExpressionKind::Arrow(func) => v.visit_function_mut(func),
        ExpressionKind::Unary { argument, .. } | ExpressionKind::Update { argument, .. } => {
            v.visit_expression_mut(argument)
        }
        ExpressionKind::Binary { left, right, .. } | ExpressionKind::Logical { left, right, .. } => {
            v.visit_expression_mut(left);
            v.visit_expression_mut(right);
        }
        ExpressionKind::Assignment { left, right, .. } => {
            walk_pattern_mut(v, left);
            v.visit_expression_mut(right);
        }
        ExpressionKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            v.visit_expression_mut(test);
            v.visit_expression_mut(consequent);
            v.visit_expression_mut(alternate);
        }
        ExpressionKind::Call { callee, arguments } | ExpressionKind::New { callee, arguments } => {
            v.visit_expression_mut(callee);
            for argument in arguments {
                v.visit_expression_mut(&mut argument.value);
            }
        }
        ExpressionKind::Member { object, property } => {
            v.visit_expression_mut(object);
            if let MemberProperty::Computed(property) = property {
                v.visit_expression_mut(property);
            }
        }
        ExpressionKind::Sequence { expressions } | ExpressionKind::Template { expressions, .. } => {
            for e in expressions {
                v.visit_expression_mut(e);
            }
        }
    }
}

fn walk_pattern_mut<V: VisitMut + ?Sized>(v: &mut V, pat: &mut Pattern) {
    match &mut pat.kind {
        PatternKind::Identifier { .. } => {}
        PatternKind::Object { properties, rest } => {
            for property in properties {
                walk_pattern_mut(v, &mut property.value);
            }
            if let Some(rest) = rest {
                walk_pattern_mut(v, rest);
            }
        }
        PatternKind::Array { elements } => {
            for element in elements.iter_mut().flatten() {
                walk_pattern_mut(v, element);
            }
        }
        PatternKind::Assignment { target, default } => {
            walk_pattern_mut(v, target);
            v.visit_expression_mut(default);
        }
        PatternKind::Rest { argument } => walk_pattern_mut(v, argument),
        PatternKind::Expression { expression } => v.visit_expression_mut(expression),
    }
}
