//! Integration tests for the retrosynth library public API

use retrosynth::{
    mcts::SearchConfig,
    Result, RetroError, ValueEstimation, DESCRIPTION, NAME, VERSION,
};

#[test]
fn test_library_metadata() {
    assert!(!VERSION.is_empty());
    assert_eq!(NAME, "retrosynth");
    assert!(!DESCRIPTION.is_empty());
}

#[test]
fn test_error_types() {
    let config_error = RetroError::Config("bad c_puct".to_string());
    assert!(matches!(config_error, RetroError::Config(_)));
    assert!(config_error.to_string().contains("bad c_puct"));

    let artifact_error = RetroError::Artifact("missing rules".to_string());
    assert!(matches!(artifact_error, RetroError::Artifact(_)));

    let io_error: RetroError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io_error, RetroError::Io(_)));
}

#[test]
fn test_result_type_alias() {
    let success: Result<i32> = Ok(42);
    assert!(success.is_ok());
    assert_eq!(success.unwrap(), 42);

    let failure: Result<i32> = Err(RetroError::Config("test".to_string()));
    assert!(failure.is_err());
}

#[test]
fn test_search_config_defaults() {
    let config = SearchConfig::default();
    assert_eq!(config.c_puct, 4.0);
    assert_eq!(config.top_n, 100);
    assert_eq!(config.step_count, 10_000);
    assert_eq!(config.depth_count, 10);
    assert_eq!(config.terminal_count, 1_000);
    assert_eq!(config.strategy, ValueEstimation::ConstantOptimistic);
    assert!(config.validate().is_ok());
}
