//! Program tree consumed and produced by the cleaner.
//!
//! The shape follows ESTree closely enough that a parser front end can map its
//! output onto it mechanically. Every statement, expression, pattern,
//! declarator and switch case carries a [`NodeId`]; all removals performed by
//! the cleaner are keyed on those ids, never on structural equality.

pub mod builder;
pub mod expression;
pub mod pattern;
pub mod statement;
pub mod visit;

pub use builder::AstBuilder;
pub use expression::{
    Argument, ArrayElement, AssignmentOp, BinaryOp, Expression, ExpressionKind, Function,
    FunctionBody, Literal, LogicalOp, MemberProperty, ObjectMember, PropertyKey, UnaryOp,
    UpdateOp,
};
pub use pattern::{ObjectPatternProperty, Pattern, PatternKind};
pub use statement::{
    Block, CatchClause, ForHead, ForInStatement, ForInit, ForStatement, IfStatement,
    LabeledStatement, Statement, StatementKind, SwitchCase, SwitchStatement, TryStatement,
    VariableDeclaration, VariableDeclarator, VariableKind, WhileStatement,
};

use crate::errors::Result;
use crate::span::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh node ids, strictly increasing, until the id space runs out
#[derive(Debug, Clone)]
pub struct NodeIdGen {
    next: Option<u32>,
}

impl NodeIdGen {
    pub fn new() -> Self {
        Self { next: Some(0) }
    }

    /// Start allocating after `id`, so new nodes never collide with existing
    /// ones. `None` when `id` is the last id there is.
    pub fn after(id: NodeId) -> Option<Self> {
        id.0.checked_add(1).map(|next| Self { next: Some(next) })
    }

    /// `None` once every id has been handed out
    pub fn next_id(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(NodeId(id))
    }
}

impl Default for NodeIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// A bare name: function names, labels, static member properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            name: name.into(),
            loc: None,
        }
    }
}

/// Top-level program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Position>,
}

impl Program {
    pub fn new(body: Vec<Statement>) -> Self {
        Program { body, loc: None }
    }

    /// Decode a tree handed over by a parser front end as JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_gen_after() {
        let mut ids = NodeIdGen::after(NodeId(41)).unwrap();
        assert_eq!(ids.next_id(), Some(NodeId(42)));
        assert_eq!(ids.next_id(), Some(NodeId(43)));
    }

    #[test]
    fn test_node_id_gen_stops_at_the_last_id() {
        assert!(NodeIdGen::after(NodeId(u32::MAX)).is_none());

        let mut ids = NodeIdGen::after(NodeId(u32::MAX - 1)).unwrap();
        assert_eq!(ids.next_id(), Some(NodeId(u32::MAX)));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.next_id(), None);
    }

    #[test]
    fn test_program_json_round_trip() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.expr_stmt(b.call_name("run", vec![]))]);
        let json = program.to_json().unwrap();
        assert!(json.contains("\"type\":\"ExpressionStatement\""));
        assert_eq!(Program::from_json(&json).unwrap(), program);
    }

    #[test]
    fn test_program_from_json_rejects_unknown_node() {
        let json = r#"{"body":[{"id":0,"type":"WithStatement"}]}"#;
        assert!(Program::from_json(json).is_err());
    }
}
