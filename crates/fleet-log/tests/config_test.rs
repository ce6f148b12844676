use std::collections::HashMap;
use std::path::PathBuf;

use fleet_log::{ConfigError, Level, LogConfig, LogOutput, RequestContext};

#[test]
fn default_config() {
    let cfg = LogConfig::default();
    assert_eq!(cfg.level, "info");
    assert_eq!(cfg.output, LogOutput::Stdout);
    assert_eq!(cfg.diagnostics.filter, "warn");
    assert!(cfg.diagnostics.json);
}

#[test]
fn config_partial_toml() {
    let partial = r#"
level = "DEBUG"

[diagnostics]
json = false
"#;
    let cfg = LogConfig::from_toml_str(partial).expect("parse partial");
    assert_eq!(cfg.level, "DEBUG");
    assert_eq!(cfg.output, LogOutput::Stdout);
    assert!(!cfg.diagnostics.json);
    assert_eq!(cfg.diagnostics.filter, "warn");
}

#[test]
fn config_file_output_from_toml() {
    let cfg = LogConfig::from_toml_str(r#"output = { file = "/tmp/fleet.log" }"#).unwrap();
    assert_eq!(cfg.output, LogOutput::File(PathBuf::from("/tmp/fleet.log")));

    let cfg = LogConfig::from_toml_str(r#"output = "stderr""#).unwrap();
    assert_eq!(cfg.output, LogOutput::Stderr);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = LogConfig::from_toml_str("level = [").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = LogConfig::load_from("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn env_overrides_use_prefix() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("FLEET_WRITER_LOG_LEVEL", "warn"),
        ("FLEET_WRITER_LOG_OUTPUT", "stderr"),
        ("OTHER_LOG_LEVEL", "debug"),
    ]);
    let mut cfg = LogConfig::default();
    cfg.apply_vars("FLEET_WRITER_", |k| vars.get(k).map(|v| v.to_string()));
    assert_eq!(cfg.level, "warn");
    assert_eq!(cfg.output, LogOutput::Stderr);
}

#[test]
fn build_logger_writes_to_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("svc.log");
    let toml = format!("level = \"warn\"\noutput = {{ file = {:?} }}\n", path.display().to_string());

    let cfg_path = dir.path().join("log.toml");
    std::fs::write(&cfg_path, toml).unwrap();

    let logger = LogConfig::load_from(&cfg_path).unwrap().build_logger().unwrap();
    assert_eq!(logger.level(), Level::Warn);

    let ctx = RequestContext::new();
    logger.info(&ctx, "hidden", &[]);
    logger.warn(&ctx, "shown", &[]);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["msg"], "shown");
}

#[test]
fn build_logger_rejects_bad_level() {
    let cfg = LogConfig {
        level: "loud".into(),
        ..LogConfig::default()
    };
    let err = cfg.build_logger().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLevel { .. }));
    assert!(err.to_string().starts_with("{\"level\":\"error\""));
}
