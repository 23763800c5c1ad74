use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_command_is_serve() {
    let cli = Cli::try_parse_from(["shellgate"]).expect("parse");
    assert!(cli.command.is_none());
    assert_eq!(cli.worker_args(), vec![OsString::from("serve")]);
}

#[test]
fn test_worker_args_forward_overrides() {
    let cli = Cli::try_parse_from([
        "shellgate",
        "supervise",
        "--config",
        "/etc/shellgate.toml",
        "--log-level",
        "info",
    ])
    .expect("parse");
    assert!(matches!(cli.command, Some(Command::Supervise)));
    assert_eq!(
        cli.worker_args(),
        vec![
            OsString::from("serve"),
            OsString::from("--config"),
            OsString::from("/etc/shellgate.toml"),
            OsString::from("--log-level"),
            OsString::from("info"),
        ]
    );
}

#[test]
fn test_exec_arguments() {
    let cli = Cli::try_parse_from(["shellgate", "exec", "ls -la", "--timeout", "-3"])
        .expect("parse");
    match cli.command {
        Some(Command::Exec { command, timeout }) => {
            assert_eq!(command, "ls -la");
            assert_eq!(timeout, Some(-3));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_cli_overrides_config() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("shellgate.toml");
    std::fs::write(&path, "log_level = \"warn\"\nkill_grace_secs = 2\n").expect("write");

    let path = path.to_str().expect("utf8 path");
    let cli = Cli::try_parse_from(["shellgate", "--config", path, "--log-level", "trace"])
    .expect("parse");
    let config = cli.resolve_config().expect("config");
    assert_eq!(config.log_level, "trace");
    assert_eq!(config.kill_grace_secs, 2);
}
