use logconf::config::{
    self, Handler, HandlerKind, Logger, LoggingConfig, load_config, save_config,
};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logging.toml");

    let mut original = LoggingConfig::default();
    original.handlers.insert(
        "FILE".to_string(),
        Handler::file(PathBuf::from("server.log"), true),
    );
    original.loggers.insert("com.example".to_string(), Logger {
        level: Some("DEBUG".to_string()),
        handlers: vec!["FILE".to_string()],
        filter_spec: Some(r#"not(match("heartbeat"))"#.to_string()),
        use_parent_handlers: false,
    });

    save_config(&path, &original).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded.root_logger.level, "INFO");
    assert_eq!(loaded.root_logger.handlers, vec!["CONSOLE".to_string()]);
    let logger = &loaded.loggers["com.example"];
    assert_eq!(logger.level.as_deref(), Some("DEBUG"));
    assert!(!logger.use_parent_handlers);
    assert_eq!(
        logger.filter_spec.as_deref(),
        Some(r#"not(match("heartbeat"))"#)
    );
    assert!(matches!(
        loaded.handlers["FILE"].kind,
        HandlerKind::File { append: true, .. }
    ));
    loaded.validate().unwrap();
}

#[test]
fn test_saved_file_carries_generated_header() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logging.toml");

    save_config(&path, config::default_config()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("# Managed by logconf"));
}

#[test]
fn test_load_missing_file_reports_path() {
    let err = load_config(std::path::Path::new("/nonexistent/logging.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/logging.toml"));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logging.toml");
    std::fs::write(&path, "loggers = \"not a table\"").unwrap();

    assert!(load_config(&path).is_err());
}

#[test]
fn test_minimal_file_fills_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("logging.toml");
    std::fs::write(&path, "[root_logger]\nlevel = \"WARN\"\n").unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.root_logger.level, "WARN");
    assert!(loaded.loggers.is_empty());
    assert!(loaded.handlers.is_empty());
}

#[test]
fn test_validation_failure_lists_every_problem() {
    let mut config = LoggingConfig::default();
    config.root_logger.level = "LOUD".to_string();
    config
        .root_logger
        .handlers
        .push("MISSING".to_string());

    let err = config.validate().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("LOUD"));
    assert!(message.contains("MISSING"));
}
