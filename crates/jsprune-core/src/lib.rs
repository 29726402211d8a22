//! Dead-code elimination over a parsed JavaScript program tree.
//!
//! [`clean`] folds constant `if`/`switch` statements, removes statements that
//! can never run, strips unreferenced functions and variables, and reports
//! unreferenced parameters. Trees come in and go out as [`ast::Program`],
//! which is also the JSON boundary with a parser front end.

pub mod analysis;
pub mod ast;
pub mod cleaner;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod printer;
pub mod span;
pub mod validate;

pub use ast::{AstBuilder, NodeId, NodeIdGen, Program};
pub use cleaner::{clean, CleanPass, CleanResult, Cleaner, PassContext};
pub use config::{CleanerConfig, CliOverrides, EliminationMode};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSummary};
pub use errors::{CleanError, Result};
pub use printer::{print_compact, print_program, PrintStyle, Printer};
pub use span::Position;
