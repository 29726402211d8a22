use super::{expression::Expression, expression::Function, pattern::Pattern, Ident, NodeId};
use crate::span::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
    #[serde(flatten)]
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(id: NodeId, kind: StatementKind) -> Self {
        Statement {
            id,
            loc: None,
            kind,
        }
    }

    pub fn with_loc(mut self, line: u32, column: u32) -> Self {
        self.loc = Some(Position::new(line, column));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatementKind {
    #[serde(rename = "ExpressionStatement")]
    Expression { expression: Expression },
    #[serde(rename = "BlockStatement")]
    Block(Block),
    #[serde(rename = "EmptyStatement")]
    Empty,
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    #[serde(rename = "SwitchStatement")]
    Switch(SwitchStatement),
    #[serde(rename = "ReturnStatement")]
    Return { argument: Option<Expression> },
    #[serde(rename = "ThrowStatement")]
    Throw { argument: Expression },
    #[serde(rename = "BreakStatement")]
    Break { label: Option<Ident> },
    #[serde(rename = "ContinueStatement")]
    Continue { label: Option<Ident> },
    #[serde(rename = "VariableDeclaration")]
    Variable(VariableDeclaration),
    #[serde(rename = "FunctionDeclaration")]
    Function(Function),
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    #[serde(rename = "DoWhileStatement")]
    DoWhile(WhileStatement),
    #[serde(rename = "ForStatement")]
    For(ForStatement),
    #[serde(rename = "ForInStatement")]
    ForIn(ForInStatement),
    #[serde(rename = "ForOfStatement")]
    ForOf(ForInStatement),
    #[serde(rename = "TryStatement")]
    Try(TryStatement),
    #[serde(rename = "LabeledStatement")]
    Labeled(LabeledStatement),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub body: Vec<Statement>,
}

impl Block {
    pub fn new(body: Vec<Statement>) -> Self {
        Block { body }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
    /// `None` for `default:`
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
    pub pattern: Pattern,
    pub init: Option<Expression>,
}

impl VariableDeclarator {
    /// Declared name when the target is a plain identifier
    pub fn simple_name(&self) -> Option<&str> {
        self.pattern.as_identifier()
    }

    pub fn has_function_init(&self) -> bool {
        self.init.as_ref().is_some_and(Expression::is_function)
    }
}

/// `while` and `do ... while` share one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub test: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expression),
}

/// `for (left in right)` and `for (left of right)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInStatement {
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForHead {
    Variable(VariableDeclaration),
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    pub block: Block,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub label: Ident,
    pub body: Box<Statement>,
}
