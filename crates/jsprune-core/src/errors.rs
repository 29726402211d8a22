use crate::ast::NodeId;
use crate::span::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions: the input tree is not one the cleaner can work on.
/// Nothing partial is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("Malformed tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node id {id} appears more than once in the tree")]
    DuplicateNodeId { id: NodeId },

    #[error("'{keyword}' outside of {expected}{}", at_position(.position))]
    OrphanedJump {
        keyword: &'static str,
        expected: &'static str,
        position: Option<Position>,
    },

    #[error("Jump to unknown label '{label}'{}", at_position(.position))]
    UnknownLabel {
        label: String,
        position: Option<Position>,
    },

    #[error("Node ids exhausted: no id is left after {}", u32::MAX)]
    NodeIdOverflow,

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CleanError>;

fn at_position(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}
