use crate::errors::{CleanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the function/variable elimination passes are repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EliminationMode {
    /// Repeat functions-then-variables until a round removes nothing
    #[default]
    FixedPoint,
    /// Exactly one functions pass followed by one variables pass
    SingleRound,
}

/// Options controlling which stages of the cleaner run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanerConfig {
    /// Rewrite `if (true)`, `if (false)` and `switch (literal)` (default: true)
    #[serde(default = "default_true")]
    pub fold_constants: bool,

    /// Remove statements after a return/throw/terminating if (default: true)
    #[serde(default = "default_true")]
    pub remove_unreachable: bool,

    /// Remove unreferenced function declarations and function-valued variables (default: true)
    #[serde(default = "default_true")]
    pub remove_unused_functions: bool,

    /// Remove unreferenced variables (default: true)
    #[serde(default = "default_true")]
    pub remove_unused_variables: bool,

    /// Report unreferenced parameters; they are never removed (default: true)
    #[serde(default = "default_true")]
    pub report_unused_parameters: bool,

    /// Keep function declarations that follow a terminator, since hoisting
    /// makes them callable from earlier code (default: false)
    #[serde(default)]
    pub hoist_function_declarations: bool,

    /// Keep every program-level binding, for scripts whose globals are used elsewhere (default: false)
    #[serde(default)]
    pub preserve_top_level: bool,

    #[serde(default)]
    pub elimination_mode: EliminationMode,
}

fn default_true() -> bool {
    true
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            fold_constants: true,
            remove_unreachable: true,
            remove_unused_functions: true,
            remove_unused_variables: true,
            report_unused_parameters: true,
            hoist_function_declarations: false,
            preserve_top_level: false,
            elimination_mode: EliminationMode::FixedPoint,
        }
    }
}

/// Command-line overrides; `None` keeps the value from the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fold_constants: Option<bool>,
    pub remove_unreachable: Option<bool>,
    pub remove_unused_functions: Option<bool>,
    pub remove_unused_variables: Option<bool>,
    pub report_unused_parameters: Option<bool>,
    pub hoist_function_declarations: Option<bool>,
    pub preserve_top_level: Option<bool>,
    pub elimination_mode: Option<EliminationMode>,
}

impl CleanerConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CleanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Merge CLI overrides into this configuration
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(value) = overrides.fold_constants {
            self.fold_constants = value;
        }
        if let Some(value) = overrides.remove_unreachable {
            self.remove_unreachable = value;
        }
        if let Some(value) = overrides.remove_unused_functions {
            self.remove_unused_functions = value;
        }
        if let Some(value) = overrides.remove_unused_variables {
            self.remove_unused_variables = value;
        }
        if let Some(value) = overrides.report_unused_parameters {
            self.report_unused_parameters = value;
        }
        if let Some(value) = overrides.hoist_function_declarations {
            self.hoist_function_declarations = value;
        }
        if let Some(value) = overrides.preserve_top_level {
            self.preserve_top_level = value;
        }
        if let Some(mode) = overrides.elimination_mode {
            self.elimination_mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert!(config.fold_constants);
        assert!(config.remove_unreachable);
        assert!(!config.hoist_function_declarations);
        assert!(!config.preserve_top_level);
        assert_eq!(config.elimination_mode, EliminationMode::FixedPoint);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CleanerConfig::from_yaml_str(
            "removeUnusedVariables: false\neliminationMode: singleRound\n",
        )
        .unwrap();
        assert!(!config.remove_unused_variables);
        assert!(config.remove_unused_functions);
        assert_eq!(config.elimination_mode, EliminationMode::SingleRound);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = CleanerConfig {
            preserve_top_level: true,
            ..CleanerConfig::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        assert!(yaml.contains("preserveTopLevel: true"));
        assert_eq!(CleanerConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = CleanerConfig::from_yaml_str("foldConstants: [").unwrap_err();
        assert!(matches!(err, CleanError::Config(_)));
    }

    #[test]
    fn test_merge_overrides() {
        let mut config = CleanerConfig::default();
        config.merge(&CliOverrides {
            remove_unreachable: Some(false),
            hoist_function_declarations: Some(true),
            elimination_mode: Some(EliminationMode::SingleRound),
            ..CliOverrides::default()
        });
        assert!(!config.remove_unreachable);
        assert!(config.hoist_function_declarations);
        assert!(config.fold_constants);
        assert_eq!(config.elimination_mode, EliminationMode::SingleRound);
    }
}
