use super::*;
use pretty_assertions::assert_eq;

fn supervisor() -> ExecutionSupervisor {
    ExecutionSupervisor::new(
        ProcessRunner::new(Duration::from_secs(1)),
        Duration::from_millis(10),
        Duration::from_millis(500),
    )
}

#[tokio::test]
async fn test_non_positive_timeout_is_rejected() {
    let sup = supervisor();
    for timeout in [0, -5] {
        let result = sup.run("echo never", timeout).await;
        assert_eq!(result, ExecutionResult::rejected(TIMEOUT_NOT_POSITIVE));
    }
}

#[tokio::test]
async fn test_interactive_commands_are_blocked() {
    let sup = supervisor();

    let result = sup.run("bash", 10).await;
    assert_eq!(
        result.warning.as_deref(),
        Some("Blocked: 'bash' would start an interactive Bash shell.")
    );
    assert_eq!(result.returncode, None);
    assert_eq!(result.output, "");

    let result = sup.run("python3", 10).await;
    assert_eq!(
        result.warning.as_deref(),
        Some("Blocked: 'python3' would start an interactive Python REPL.")
    );

    let result = sup.run("bash -i", 10).await;
    assert_eq!(
        result.warning.as_deref(),
        Some("Blocked: 'bash -i' requests interactive mode.")
    );
}

#[test]
fn test_from_config_uses_configured_grace() {
    let config = GatewayConfig {
        kill_grace_secs: 9,
        ..Default::default()
    };
    let sup = ExecutionSupervisor::from_config(&config);
    assert_eq!(sup.poll_interval, Duration::from_millis(50));
    assert_eq!(sup.drain_timeout, Duration::from_millis(2_000));
}

#[cfg(unix)]
mod unix_tests {
    use std::time::Instant;

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_runs_non_interactive_shell() {
        let result = supervisor().run("bash -c 'echo hi'", 10).await;
        assert_eq!(
            result,
            ExecutionResult {
                output: "hi".to_string(),
                warning: None,
                returncode: Some(0),
            }
        );
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr_trimmed() {
        let result = supervisor()
            .run("echo; echo out; echo err 1>&2; echo", 10)
            .await;
        assert_eq!(result.output, "out\nerr");
        assert_eq!(result.returncode, Some(0));
        assert_eq!(result.warning, None);
    }

    #[tokio::test]
    async fn test_reports_exit_code() {
        let result = supervisor().run("echo failing; exit 7", 10).await;
        assert_eq!(result.output, "failing");
        assert_eq!(result.returncode, Some(7));
        assert_eq!(result.warning, None);
    }

    #[tokio::test]
    async fn test_timeout_terminates_promptly() {
        let started = Instant::now();
        let result = supervisor().run("echo started; sleep 5", 1).await;

        assert!(
            started.elapsed() < Duration::from_secs(4),
            "took {:?}",
            started.elapsed()
        );
        assert_eq!(
            result.warning.as_deref(),
            Some("Process exceeded 1s - terminating.")
        );
        assert_eq!(result.output, "started");
        let code = result.returncode.expect("spawned");
        assert_ne!(code, 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_background_descendants() {
        let started = Instant::now();
        let result = supervisor().run("sleep 30 & sleep 30; wait", 1).await;

        // A surviving descendant would hold the output pipe open until the
        // drain timeout expired as well; both are bounded well under 30s.
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            result.warning.as_deref(),
            Some("Process exceeded 1s - terminating.")
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_descendants_that_ignore_sigterm() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("survived");
        let command = format!(
            "(trap '' TERM; sleep 3; touch '{}'); echo done",
            marker.display()
        );

        let result = supervisor().run(&command, 1).await;
        assert_eq!(
            result.warning.as_deref(),
            Some("Process exceeded 1s - terminating.")
        );
        assert_eq!(result.output, "");

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!marker.exists(), "descendant outlived the timeout");
    }

    #[tokio::test]
    async fn test_prompt_warning_keeps_returncode() {
        let result = supervisor().run("printf 'ready\\n>>> '", 10).await;
        assert_eq!(result.output, "ready\n>>>");
        assert_eq!(
            result.warning.as_deref(),
            Some(classifier::PROMPT_WARNING)
        );
        assert_eq!(result.returncode, Some(0));
    }

    #[tokio::test]
    async fn test_same_command_gives_same_result() {
        let sup = supervisor();
        let first = sup.run("echo same; exit 2", 10).await;
        let second = sup.run("echo same; exit 2", 10).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let sup = supervisor();
        let (a, b) = tokio::join!(
            sup.run("sleep 0.2; echo a", 10),
            sup.run("echo b; exit 1", 10)
        );
        assert_eq!((a.output.as_str(), a.returncode), ("a", Some(0)));
        assert_eq!((b.output.as_str(), b.returncode), ("b", Some(1)));
    }

    #[tokio::test]
    async fn test_missing_program_reports_shell_status() {
        let result = supervisor()
            .run("definitely-not-a-real-program-xyz", 10)
            .await;
        assert_eq!(result.returncode, Some(127));
        assert!(result.output.contains("not found"), "{}", result.output);
    }
}

#[derive(Debug)]
struct MissingShell;

impl crate::process::ProcessGroup for MissingShell {
    fn shell_command(&self, command: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new("/nonexistent/shellgate-shell");
        cmd.arg(command);
        cmd
    }

    fn soft_interrupt(&self, _pid: u32) -> bool {
        false
    }

    fn hard_kill_tree(&self, _pid: u32) {}
}

#[tokio::test]
async fn test_spawn_failure_is_reported_as_result() {
    let sup = ExecutionSupervisor::new(
        ProcessRunner::with_group(std::sync::Arc::new(MissingShell), Duration::from_secs(1)),
        Duration::from_millis(10),
        Duration::from_millis(500),
    );
    let result = sup.run("echo hi", 5).await;

    assert_eq!(result.output, "");
    assert_eq!(result.returncode, Some(UNKNOWN_EXIT_CODE));
    let warning = result.warning.expect("warning");
    assert!(
        warning.starts_with("Failed to spawn command:"),
        "{warning}"
    );
}
