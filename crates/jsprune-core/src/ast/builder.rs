//! Fluent construction of program trees with fresh node ids.
//!
//! Parser front ends and tests use this to build trees without managing
//! [`NodeId`]s by hand. Methods take `&self`, so calls nest freely:
//!
//! ```rust
//! use jsprune_core::ast::{AstBuilder, Program, VariableKind};
//!
//! let b = AstBuilder::new();
//! let program = Program::new(vec![
//!     b.var(VariableKind::Const, "x", Some(b.num(1.0))),
//!     b.expr_stmt(b.call(b.member(b.ident("console"), "log"), vec![b.ident("x")])),
//! ]);
//! assert_eq!(program.body.len(), 2);
//! ```

use super::{
    Argument, ArrayElement, AssignmentOp, BinaryOp, Block, CatchClause, Expression,
    ExpressionKind, ForHead, ForInStatement, ForInit, ForStatement, Function, FunctionBody, Ident,
    IfStatement, LabeledStatement, Literal, MemberProperty, NodeId, ObjectMember, Pattern,
    PatternKind, PropertyKey, Statement, StatementKind, SwitchCase, SwitchStatement,
    TryStatement, UpdateOp, VariableDeclaration, VariableDeclarator, VariableKind,
    WhileStatement,
};
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct AstBuilder {
    next: Cell<u32>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after an existing tree's highest id
    pub fn starting_after(id: NodeId) -> Self {
        Self {
            next: Cell::new(id.0 + 1),
        }
    }

    pub fn id(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }

    fn stmt(&self, kind: StatementKind) -> Statement {
        Statement::new(self.id(), kind)
    }

    fn expr(&self, kind: ExpressionKind) -> Expression {
        Expression::new(self.id(), kind)
    }

    // ----- expressions -----

    pub fn ident(&self, name: &str) -> Expression {
        self.expr(ExpressionKind::Identifier {
            name: name.to_string(),
        })
    }

    pub fn num(&self, value: f64) -> Expression {
        self.lit(Literal::Number(value))
    }

    pub fn str(&self, value: &str) -> Expression {
        self.lit(Literal::String(value.to_string()))
    }

    pub fn bool(&self, value: bool) -> Expression {
        self.lit(Literal::Boolean(value))
    }

    pub fn null(&self) -> Expression {
        self.lit(Literal::Null)
    }

    pub fn lit(&self, value: Literal) -> Expression {
        self.expr(ExpressionKind::Literal { value })
    }

    pub fn this(&self) -> Expression {
        self.expr(ExpressionKind::This)
    }

    pub fn array(&self, elements: Vec<Expression>) -> Expression {
        self.expr(ExpressionKind::Array {
            elements: elements.into_iter().map(ArrayElement::Expression).collect(),
        })
    }

    /// Object literal with plain `key: value` properties
    pub fn object(&self, properties: Vec<(&str, Expression)>) -> Expression {
        self.expr(ExpressionKind::Object {
            properties: properties
                .into_iter()
                .map(|(key, value)| ObjectMember::Property {
                    key: PropertyKey::Identifier(key.to_string()),
                    value,
                    shorthand: false,
                })
                .collect(),
        })
    }

    pub fn call(&self, callee: Expression, args: Vec<Expression>) -> Expression {
        self.expr(ExpressionKind::Call {
            callee: Box::new(callee),
            arguments: args.into_iter().map(Self::arg).collect(),
        })
    }

    /// `name(args)`
    pub fn call_name(&self, name: &str, args: Vec<Expression>) -> Expression {
        self.call(self.ident(name), args)
    }

    pub fn new_expr(&self, callee: Expression, args: Vec<Expression>) -> Expression {
        self.expr(ExpressionKind::New {
            callee: Box::new(callee),
            arguments: args.into_iter().map(Self::arg).collect(),
        })
    }

    fn arg(value: Expression) -> Argument {
        Argument {
            value,
            spread: false,
        }
    }

    pub fn member(&self, object: Expression, property: &str) -> Expression {
        self.expr(ExpressionKind::Member {
            object: Box::new(object),
            property: MemberProperty::Static(Ident::new(property)),
        })
    }

    pub fn index(&self, object: Expression, property: Expression) -> Expression {
        self.expr(ExpressionKind::Member {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(property)),
        })
    }

    /// `console.log(args)`
    pub fn console_log(&self, args: Vec<Expression>) -> Expression {
        self.call(self.member(self.ident("console"), "log"), args)
    }

    pub fn binary(&self, operator: BinaryOp, left: Expression, right: Expression) -> Expression {
        self.expr(ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(&self, target: &str, value: Expression) -> Expression {
        self.assign_to(self.pat(target), value)
    }

    pub fn assign_to(&self, target: Pattern, value: Expression) -> Expression {
        self.expr(ExpressionKind::Assignment {
            operator: AssignmentOp::Assign,
            left: Box::new(target),
            right: Box::new(value),
        })
    }

    pub fn update(&self, operator: UpdateOp, prefix: bool, argument: Expression) -> Expression {
        self.expr(ExpressionKind::Update {
            operator,
            prefix,
            argument: Box::new(argument),
        })
    }

    pub fn function_expr(
        &self,
        name: Option<&str>,
        params: &[&str],
        body: Vec<Statement>,
    ) -> Expression {
        self.expr(ExpressionKind::Function(self.function(name, params, body)))
    }

    pub fn arrow(&self, params: &[&str], body: Vec<Statement>) -> Expression {
        self.expr(ExpressionKind::Arrow(self.function(None, params, body)))
    }

    /// Arrow with a concise expression body
    pub fn arrow_expr(&self, params: &[&str], body: Expression) -> Expression {
        self.expr(ExpressionKind::Arrow(Function {
            name: None,
            params: params.iter().map(|p| self.pat(p)).collect(),
            body: FunctionBody::Expression(Box::new(body)),
            is_async: false,
            is_generator: false,
        }))
    }

    fn function(&self, name: Option<&str>, params: &[&str], body: Vec<Statement>) -> Function {
        self.function_with_patterns(name, params.iter().map(|p| self.pat(p)).collect(), body)
    }

    pub fn function_with_patterns(
        &self,
        name: Option<&str>,
        params: Vec<Pattern>,
        body: Vec<Statement>,
    ) -> Function {
        Function {
            name: name.map(Ident::new),
            params,
            body: FunctionBody::Block(Block::new(body)),
            is_async: false,
            is_generator: false,
        }
    }

    // ----- patterns -----

    pub fn pat(&self, name: &str) -> Pattern {
        Pattern::new(
            self.id(),
            PatternKind::Identifier {
                name: name.to_string(),
            },
        )
    }

    /// `{ a, b }` shorthand object pattern
    pub fn object_pat(&self, names: &[&str]) -> Pattern {
        Pattern::new(
            self.id(),
            PatternKind::Object {
                properties: names
                    .iter()
                    .map(|name| super::ObjectPatternProperty {
                        key: PropertyKey::Identifier(name.to_string()),
                        value: self.pat(name),
                        shorthand: true,
                    })
                    .collect(),
                rest: None,
            },
        )
    }

    pub fn array_pat(&self, names: &[&str]) -> Pattern {
        Pattern::new(
            self.id(),
            PatternKind::Array {
                elements: names.iter().map(|name| Some(self.pat(name))).collect(),
            },
        )
    }

    /// `target = default` parameter or element
    pub fn default_pat(&self, name: &str, default: Expression) -> Pattern {
        Pattern::new(
            self.id(),
            PatternKind::Assignment {
                target: Box::new(self.pat(name)),
                default: Box::new(default),
            },
        )
    }

    // ----- statements -----

    pub fn expr_stmt(&self, expression: Expression) -> Statement {
        self.stmt(StatementKind::Expression { expression })
    }

    pub fn block(&self, body: Vec<Statement>) -> Statement {
        self.stmt(StatementKind::Block(Block::new(body)))
    }

    pub fn empty(&self) -> Statement {
        self.stmt(StatementKind::Empty)
    }

    pub fn if_(
        &self,
        test: Expression,
        consequent: Statement,
        alternate: Option<Statement>,
    ) -> Statement {
        self.stmt(StatementKind::If(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        }))
    }

    pub fn switch(&self, discriminant: Expression, cases: Vec<SwitchCase>) -> Statement {
        self.stmt(StatementKind::Switch(SwitchStatement {
            discriminant,
            cases,
        }))
    }

    /// `case test:`; pass `None` for `default:`
    pub fn case(&self, test: Option<Expression>, consequent: Vec<Statement>) -> SwitchCase {
        SwitchCase {
            id: self.id(),
            loc: None,
            test,
            consequent,
        }
    }

    pub fn ret(&self, argument: Option<Expression>) -> Statement {
        self.stmt(StatementKind::Return { argument })
    }

    pub fn throw(&self, argument: Expression) -> Statement {
        self.stmt(StatementKind::Throw { argument })
    }

    pub fn brk(&self) -> Statement {
        self.stmt(StatementKind::Break { label: None })
    }

    pub fn brk_label(&self, label: &str) -> Statement {
        self.stmt(StatementKind::Break {
            label: Some(Ident::new(label)),
        })
    }

    pub fn cont(&self) -> Statement {
        self.stmt(StatementKind::Continue { label: None })
    }

    /// Single-declarator declaration `kind name = init;`
    pub fn var(&self, kind: VariableKind, name: &str, init: Option<Expression>) -> Statement {
        self.vars(kind, vec![(name, init)])
    }

    /// Multi-declarator declaration `kind a = 1, b = 2;`
    pub fn vars(&self, kind: VariableKind, declarators: Vec<(&str, Option<Expression>)>) -> Statement {
        let declarations = declarators
            .into_iter()
            .map(|(name, init)| self.declarator(self.pat(name), init))
            .collect();
        self.stmt(StatementKind::Variable(VariableDeclaration { kind, declarations }))
    }

    /// Declaration with an arbitrary (possibly destructuring) target
    pub fn var_pattern(&self, kind: VariableKind, pattern: Pattern, init: Option<Expression>) -> Statement {
        self.stmt(StatementKind::Variable(VariableDeclaration {
            kind,
            declarations: vec![self.declarator(pattern, init)],
        }))
    }

    pub fn declarator(&self, pattern: Pattern, init: Option<Expression>) -> VariableDeclarator {
        VariableDeclarator {
            id: self.id(),
            loc: None,
            pattern,
            init,
        }
    }

    pub fn function_decl(&self, name: &str, params: &[&str], body: Vec<Statement>) -> Statement {
        self.stmt(StatementKind::Function(self.function(Some(name), params, body)))
    }

    pub fn function_decl_with(&self, function: Function) -> Statement {
        self.stmt(StatementKind::Function(function))
    }

    pub fn while_(&self, test: Expression, body: Statement) -> Statement {
        self.stmt(StatementKind::While(WhileStatement {
            test,
            body: Box::new(body),
        }))
    }

    pub fn do_while(&self, body: Statement, test: Expression) -> Statement {
        self.stmt(StatementKind::DoWhile(WhileStatement {
            test,
            body: Box::new(body),
        }))
    }

    pub fn for_(
        &self,
        init: Option<ForInit>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Statement,
    ) -> Statement {
        self.stmt(StatementKind::For(ForStatement {
            init,
            test,
            update,
            body: Box::new(body),
        }))
    }

    /// `for (kind name of right) body`
    pub fn for_of(&self, kind: VariableKind, name: &str, right: Expression, body: Statement) -> Statement {
        self.stmt(StatementKind::ForOf(ForInStatement {
            left: ForHead::Variable(VariableDeclaration {
                kind,
                declarations: vec![self.declarator(self.pat(name), None)],
            }),
            right,
            body: Box::new(body),
        }))
    }

    pub fn try_(
        &self,
        block: Vec<Statement>,
        handler: Option<(Option<&str>, Vec<Statement>)>,
        finalizer: Option<Vec<Statement>>,
    ) -> Statement {
        self.stmt(StatementKind::Try(TryStatement {
            block: Block::new(block),
            handler: handler.map(|(param, body)| CatchClause {
                param: param.map(|p| self.pat(p)),
                body: Block::new(body),
            }),
            finalizer: finalizer.map(Block::new),
        }))
    }

    pub fn labeled(&self, label: &str, body: Statement) -> Statement {
        self.stmt(StatementKind::Labeled(LabeledStatement {
            label: Ident::new(label),
            body: Box::new(body),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let b = AstBuilder::new();
        let stmt = b.expr_stmt(b.call_name("f", vec![b.num(1.0)]));
        // callee, argument and call are built before the statement
        assert_eq!(stmt.id, NodeId(3));
    }

    #[test]
    fn test_starting_after() {
        let b = AstBuilder::starting_after(NodeId(9));
        assert_eq!(b.id(), NodeId(10));
    }
}
