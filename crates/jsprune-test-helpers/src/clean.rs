//! Shortcuts for running the cleaner in tests

use jsprune_core::{clean, print_compact, CleanResult, CleanerConfig, Program};

/// Clean with the default configuration, panicking on a malformed tree
pub fn clean_default(program: Program) -> CleanResult {
    clean_with(program, &CleanerConfig::default())
}

pub fn clean_with(program: Program, config: &CleanerConfig) -> CleanResult {
    match clean(program, config) {
        Ok(result) => result,
        Err(err) => panic!("clean failed: {}", err),
    }
}

/// Clean with the default configuration and print the result on one line
pub fn clean_to_string(program: Program) -> String {
    print_compact(&clean_default(program).program)
}

/// `(kind, name)` of every diagnostic, for compact assertions
pub fn diagnostic_names(result: &CleanResult) -> Vec<(String, Option<String>)> {
    result
        .diagnostics
        .iter()
        .map(|d| (d.kind.to_string(), d.name.clone()))
        .collect()
}
