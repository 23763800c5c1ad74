use super::*;
use serial_test::serial;

#[test]
#[serial]
fn test_explicit_file_is_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("gate.toml");
    std::fs::write(&file, "default_timeout_secs = 9\nkill_grace_secs = 2\n").expect("write");

    let config = load_config(Some(&file)).expect("load");
    assert_eq!(config.default_timeout_secs, 9);
    assert_eq!(config.kill_grace_secs, 2);
    assert_eq!(config.restart_delay_ms, 200);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_config(Some(&dir.path().join("absent.toml"))).expect_err("missing");
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
#[serial]
fn test_invalid_toml_reports_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("bad.toml");
    std::fs::write(&file, "default_timeout_secs = \"soon\"").expect("write");

    let err = load_config(Some(&file)).expect_err("bad toml");
    match err {
        ConfigError::InvalidToml { file: reported, .. } => {
            assert!(reported.ends_with("bad.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
#[serial]
fn test_file_values_are_validated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("zero.toml");
    std::fs::write(&file, "poll_interval_ms = 0").expect("write");

    let err = load_config(Some(&file)).expect_err("invalid");
    assert!(matches!(err, ConfigError::InvalidValue { field: "poll_interval_ms", .. }));
}
