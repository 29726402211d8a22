use super::{expression::Expression, expression::PropertyKey, NodeId};
use crate::span::Position;
use serde::{Deserialize, Serialize};

/// Binding or assignment target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
    #[serde(flatten)]
    pub kind: PatternKind,
}

impl Pattern {
    pub fn new(id: NodeId, kind: PatternKind) -> Self {
        Pattern {
            id,
            loc: None,
            kind,
        }
    }

    pub fn with_loc(mut self, line: u32, column: u32) -> Self {
        self.loc = Some(Position::new(line, column));
        self
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            PatternKind::Identifier { name } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternKind {
    Identifier {
        name: String,
    },
    #[serde(rename = "ObjectPattern")]
    Object {
        properties: Vec<ObjectPatternProperty>,
        #[serde(default)]
        rest: Option<Box<Pattern>>,
    },
    #[serde(rename = "ArrayPattern")]
    Array {
        elements: Vec<Option<Pattern>>,
    },
    /// `target = default`
    #[serde(rename = "AssignmentPattern")]
    Assignment {
        target: Box<Pattern>,
        default: Box<Expression>,
    },
    #[serde(rename = "RestElement")]
    Rest {
        argument: Box<Pattern>,
    },
    /// Member expression used as an assignment target (`a.b = 1`)
    #[serde(rename = "ExpressionPattern")]
    Expression {
        expression: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatternProperty {
    pub key: PropertyKey,
    pub value: Pattern,
    #[serde(default)]
    pub shorthand: bool,
}
