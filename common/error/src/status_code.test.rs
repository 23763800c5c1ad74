use super::*;
use strum::IntoEnumIterator;

#[test]
fn test_category_follows_numeric_prefix() {
    for code in StatusCode::iter() {
        let expected = match code as i32 {
            1_000..=1_999 => StatusCategory::Common,
            2_000..=2_999 => StatusCategory::Input,
            3_000..=3_999 => StatusCategory::IO,
            6_000..=6_999 => StatusCategory::Process,
            10_000..=10_999 => StatusCategory::Config,
            other => panic!("{code} has a value outside every category: {other}"),
        };
        assert_eq!(code.category(), expected, "{code}");
    }
}

#[test]
fn test_only_transient_failures_are_retryable() {
    let retryable: Vec<StatusCode> = StatusCode::iter().filter(|c| c.is_retryable()).collect();
    assert_eq!(retryable, vec![StatusCode::Internal]);
}

#[test]
fn test_spawn_failures_are_logged_as_errors() {
    assert!(StatusCode::ProcessSpawn.should_log_error());
    assert!(StatusCode::Internal.should_log_error());
    assert!(!StatusCode::IoError.should_log_error());
    assert!(!StatusCode::InvalidArguments.should_log_error());
}

#[test]
fn test_display_is_variant_name() {
    assert_eq!(StatusCode::ToolNotFound.to_string(), "ToolNotFound");
    assert_eq!(StatusCode::ConfigFileError.to_string(), "ConfigFileError");
}
