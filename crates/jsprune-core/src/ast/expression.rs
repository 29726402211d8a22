use super::{pattern::Pattern, statement::Block, Ident, NodeId};
use crate::span::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
    #[serde(flatten)]
    pub kind: ExpressionKind,
}

impl Expression {
    pub fn new(id: NodeId, kind: ExpressionKind) -> Self {
        Expression {
            id,
            loc: None,
            kind,
        }
    }

    pub fn with_loc(mut self, line: u32, column: u32) -> Self {
        self.loc = Some(Position::new(line, column));
        self
    }

    /// Function expression or arrow function
    pub fn is_function(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Function(_) | ExpressionKind::Arrow(_)
        )
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExpressionKind::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// `Some(b)` when the expression is the boolean literal `b`
    pub fn as_boolean_literal(&self) -> Option<bool> {
        match self.as_literal() {
            Some(Literal::Boolean(value)) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExpressionKind {
    Identifier {
        name: String,
    },
    Literal {
        value: Literal,
    },
    #[serde(rename = "ThisExpression")]
    This,
    #[serde(rename = "ArrayExpression")]
    Array {
        elements: Vec<ArrayElement>,
    },
    #[serde(rename = "ObjectExpression")]
    Object {
        properties: Vec<ObjectMember>,
    },
    #[serde(rename = "FunctionExpression")]
    Function(Function),
    #[serde(rename = "ArrowFunctionExpression")]
    Arrow(Function),
    #[serde(rename = "UnaryExpression")]
    Unary {
        operator: UnaryOp,
        argument: Box<Expression>,
    },
    #[serde(rename = "UpdateExpression")]
    Update {
        operator: UpdateOp,
        prefix: bool,
        argument: Box<Expression>,
    },
    #[serde(rename = "BinaryExpression")]
    Binary {
        operator: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "LogicalExpression")]
    Logical {
        operator: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    #[serde(rename = "AssignmentExpression")]
    Assignment {
        operator: AssignmentOp,
        left: Box<Pattern>,
        right: Box<Expression>,
    },
    #[serde(rename = "ConditionalExpression")]
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    #[serde(rename = "CallExpression")]
    Call {
        callee: Box<Expression>,
        arguments: Vec<Argument>,
    },
    #[serde(rename = "NewExpression")]
    New {
        callee: Box<Expression>,
        arguments: Vec<Argument>,
    },
    #[serde(rename = "MemberExpression")]
    Member {
        object: Box<Expression>,
        property: MemberProperty,
    },
    #[serde(rename = "SequenceExpression")]
    Sequence {
        expressions: Vec<Expression>,
    },
    #[serde(rename = "TemplateLiteral")]
    Template {
        quasis: Vec<String>,
        expressions: Vec<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// `===` between two literals; NaN never matches
    pub fn strict_equals(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Null, Literal::Null) => true,
            (Literal::Boolean(a), Literal::Boolean(b)) => a == b,
            (Literal::Number(a), Literal::Number(b)) => a == b,
            (Literal::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }
}

/// Shared by function declarations, function expressions and arrows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub is_generator: bool,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|ident| ident.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunctionBody {
    Block(Block),
    /// Concise arrow body
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub value: Expression,
    #[serde(default)]
    pub spread: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrayElement {
    Expression(Expression),
    Spread(Expression),
    Hole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectMember {
    Property {
        key: PropertyKey,
        value: Expression,
        #[serde(default)]
        shorthand: bool,
    },
    #[serde(rename = "SpreadElement")]
    Spread { argument: Expression },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(f64),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberProperty {
    Static(Ident),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "~")]
    BitwiseNot,
    #[serde(rename = "typeof")]
    Typeof,
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "delete")]
    Delete,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitwiseNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl UpdateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    #[serde(rename = "**")]
    Exponent,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "===")]
    StrictEqual,
    #[serde(rename = "!==")]
    StrictNotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "&")]
    BitwiseAnd,
    #[serde(rename = "|")]
    BitwiseOr,
    #[serde(rename = "^")]
    BitwiseXor,
    #[serde(rename = "<<")]
    ShiftLeft,
    #[serde(rename = ">>")]
    ShiftRight,
    #[serde(rename = ">>>")]
    UnsignedShiftRight,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    Instanceof,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Exponent => "**",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::BitwiseAnd => "&",
            BinaryOp::BitwiseOr => "|",
            BinaryOp::BitwiseXor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::UnsignedShiftRight => ">>>",
            BinaryOp::In => "in",
            BinaryOp::Instanceof => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    NullishCoalescing,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::NullishCoalescing => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOp {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubtractAssign,
    #[serde(rename = "*=")]
    MultiplyAssign,
    #[serde(rename = "/=")]
    DivideAssign,
    #[serde(rename = "%=")]
    ModuloAssign,
    #[serde(rename = "||=")]
    OrAssign,
    #[serde(rename = "&&=")]
    AndAssign,
    #[serde(rename = "??=")]
    NullishAssign,
}

impl AssignmentOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubtractAssign => "-=",
            AssignmentOp::MultiplyAssign => "*=",
            AssignmentOp::DivideAssign => "/=",
            AssignmentOp::ModuloAssign => "%=",
            AssignmentOp::OrAssign => "||=",
            AssignmentOp::AndAssign => "&&=",
            AssignmentOp::NullishAssign => "??=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equals() {
        assert!(Literal::Number(2.0).strict_equals(&Literal::Number(2.0)));
        assert!(!Literal::Number(f64::NAN).strict_equals(&Literal::Number(f64::NAN)));
        assert!(!Literal::String("2".into()).strict_equals(&Literal::Number(2.0)));
        assert!(Literal::String("a".into()).strict_equals(&Literal::String("a".into())));
    }

    #[test]
    fn test_literal_json_is_untagged() {
        assert_eq!(serde_json::to_string(&Literal::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Literal::Number(1.5)).unwrap(), "1.5");
        let lit: Literal = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(lit, Literal::String("hi".into()));
        let lit: Literal = serde_json::from_str("true").unwrap();
        assert_eq!(lit, Literal::Boolean(true));
    }
}
