use crate::span::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnreachableStatement,
    UnusedVariable,
    UnusedFunction,
    UnusedParameter,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnreachableStatement => "unreachable-statement",
            DiagnosticKind::UnusedVariable => "unused-variable",
            DiagnosticKind::UnusedFunction => "unused-function",
            DiagnosticKind::UnusedParameter => "unused-parameter",
        }
    }

    /// Whether the reported node was removed from the tree
    pub fn is_removal(&self) -> bool {
        !matches!(self, DiagnosticKind::UnusedParameter)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected unreachable statement or unused declaration.
/// `line`/`column` are absent when the node carried no position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Option<Position>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: None,
            line: position.map(|p| p.line),
            column: position.map(|p| p.column),
            snippet: None,
            reason: reason.into(),
        }
    }

    pub fn unreachable(position: Option<Position>, snippet: String) -> Self {
        Self {
            snippet: Some(snippet),
            ..Self::new(
                DiagnosticKind::UnreachableStatement,
                position,
                "Unreachable code detected by control flow analysis",
            )
        }
    }

    pub fn unused_function(name: &str, position: Option<Position>) -> Self {
        Self::new(
            DiagnosticKind::UnusedFunction,
            position,
            format!("Function '{}' is declared but never referenced", name),
        )
        .with_name(name)
    }

    pub fn unused_variable(name: &str, position: Option<Position>) -> Self {
        Self::new(
            DiagnosticKind::UnusedVariable,
            position,
            format!("Variable '{}' is declared but never referenced", name),
        )
        .with_name(name)
    }

    pub fn unused_parameter(name: &str, function: Option<&str>, position: Option<Position>) -> Self {
        let owner = match function {
            Some(function) => format!("function '{}'", function),
            None => "anonymous function".to_string(),
        };
        Self::new(
            DiagnosticKind::UnusedParameter,
            position,
            format!("Parameter '{}' of {} is never referenced", name, owner),
        )
        .with_name(name)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn position(&self) -> Option<Position> {
        match (self.line, self.column) {
            (Some(line), Some(column)) => Some(Position::new(line, column)),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(position) = self.position() {
            write!(f, " at {}", position)?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Diagnostic counts per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSummary {
    pub unreachable_statements: usize,
    pub unused_functions: usize,
    pub unused_variables: usize,
    pub unused_parameters: usize,
}

impl DiagnosticSummary {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut summary = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.kind {
                DiagnosticKind::UnreachableStatement => summary.unreachable_statements += 1,
                DiagnosticKind::UnusedFunction => summary.unused_functions += 1,
                DiagnosticKind::UnusedVariable => summary.unused_variables += 1,
                DiagnosticKind::UnusedParameter => summary.unused_parameters += 1,
            }
        }
        summary
    }

    /// Number of nodes removed from the tree
    pub fn removals(&self) -> usize {
        self.unreachable_statements + self.unused_functions + self.unused_variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_without_position_omits_location() {
        let diag = Diagnostic::unused_variable("y", None);
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("line"));
        assert!(!json.contains("column"));
        assert!(json.contains(r#""kind":"unused-variable""#));
        assert_eq!(diag.to_string(), "unused-variable: Variable 'y' is declared but never referenced");
    }

    #[test]
    fn test_diagnostic_display_with_position() {
        let diag = Diagnostic::unused_function("helper", Some(Position::new(2, 0)));
        assert_eq!(
            diag.to_string(),
            "unused-function at 2:0: Function 'helper' is declared but never referenced"
        );
        assert_eq!(diag.name.as_deref(), Some("helper"));
    }

    #[test]
    fn test_summary_counts() {
        let diagnostics = vec![
            Diagnostic::unreachable(None, "dead();".to_string()),
            Diagnostic::unused_function("f", None),
            Diagnostic::unused_parameter("a", Some("f"), None),
        ];
        let summary = DiagnosticSummary::from_diagnostics(&diagnostics);
        assert_eq!(summary.unreachable_statements, 1);
        assert_eq!(summary.unused_functions, 1);
        assert_eq!(summary.unused_parameters, 1);
        assert_eq!(summary.removals(), 2);
    }
}
