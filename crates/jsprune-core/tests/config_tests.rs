use indoc::indoc;
use jsprune_core::{CleanError, CleanerConfig, CliOverrides, EliminationMode};
use jsprune_test_helpers::clean::clean_with;
use jsprune_test_helpers::fixtures;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_full_config_file() {
    let yaml = indoc! {"
        foldConstants: false
        removeUnreachable: true
        removeUnusedFunctions: false
        removeUnusedVariables: true
        reportUnusedParameters: false
        hoistFunctionDeclarations: true
        preserveTopLevel: true
        eliminationMode: singleRound
    "};
    let config = CleanerConfig::from_yaml_str(yaml).unwrap();
    assert!(!config.fold_constants);
    assert!(!config.remove_unused_functions);
    assert!(!config.report_unused_parameters);
    assert!(config.hoist_function_declarations);
    assert!(config.preserve_top_level);
    assert_eq!(config.elimination_mode, EliminationMode::SingleRound);
}

#[test]
fn test_config_from_file_drives_the_cleaner() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"removeUnusedFunctions: false\n").unwrap();
    let config = CleanerConfig::from_file(file.path()).unwrap();

    let result = clean_with(fixtures::end_to_end_program(), &config);
    assert_eq!(result.summary().unused_functions, 0);
    assert_eq!(result.summary().unused_variables, 1);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = CleanerConfig::from_file(std::path::Path::new("no/such/jsprune.yaml")).unwrap_err();
    assert!(matches!(err, CleanError::Io { .. }));
    assert!(err.to_string().starts_with("Failed to read no/such/jsprune.yaml"));
}

#[test]
fn test_unknown_mode_is_rejected() {
    let yaml = indoc! {"
        eliminationMode: sometimes
    "};
    assert!(matches!(
        CleanerConfig::from_yaml_str(yaml),
        Err(CleanError::Config(_))
    ));
}

#[test]
fn test_overrides_win_over_file_values() {
    let mut config = CleanerConfig::from_yaml_str("preserveTopLevel: true\n").unwrap();
    config.merge(&CliOverrides {
        preserve_top_level: Some(false),
        remove_unreachable: Some(false),
        ..CliOverrides::default()
    });
    assert!(!config.preserve_top_level);
    assert!(!config.remove_unreachable);
    assert!(config.fold_constants);
}
