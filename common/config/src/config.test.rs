use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_defaults() {
    let config = GatewayConfig::default();
    assert_eq!(config.default_timeout_secs, 60);
    assert_eq!(config.poll_interval(), Duration::from_millis(50));
    assert_eq!(config.kill_grace(), Duration::from_secs(5));
    assert_eq!(config.restart_delay(), Duration::from_millis(200));
    assert_eq!(config.restart_exit_code, 87);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config: GatewayConfig = toml::from_str(
        r#"
default_timeout_secs = 15
log_level = "info"
"#,
    )
    .expect("parse");
    assert_eq!(
        config,
        GatewayConfig {
            default_timeout_secs: 15,
            log_level: "info".to_string(),
            ..GatewayConfig::default()
        }
    );
}

#[test]
fn test_validate_rejects_non_positive_timeout() {
    let config = GatewayConfig {
        default_timeout_secs: 0,
        ..GatewayConfig::default()
    };
    let err = config.validate().expect_err("zero timeout");
    assert!(err.to_string().contains("default_timeout_secs"));
}

#[test]
fn test_validate_rejects_zero_poll_interval() {
    let config = GatewayConfig {
        poll_interval_ms: 0,
        ..GatewayConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_success_as_restart_code() {
    let config = GatewayConfig {
        restart_exit_code: 0,
        ..GatewayConfig::default()
    };
    assert!(config.validate().is_err());
}
