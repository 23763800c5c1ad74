use super::*;
use pretty_assertions::assert_eq;

#[cfg(unix)]
fn shell_worker(script: &str) -> WorkerSupervisor {
    WorkerSupervisor::new(
        PathBuf::from("/bin/sh"),
        vec![OsString::from("-c"), OsString::from(script)],
        87,
    )
}

#[cfg(unix)]
#[tokio::test]
async fn test_respawns_on_restart_code() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let counter = dir.path().join("runs");
    let script = format!(
        "echo x >> '{path}'; if [ $(wc -l < '{path}') -lt 3 ]; then exit 87; fi; exit 5",
        path = counter.display()
    );

    let code = shell_worker(&script).run().await.expect("run");

    assert_eq!(code, 5);
    let runs = std::fs::read_to_string(&counter).expect("counter");
    assert_eq!(runs.lines().count(), 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_propagates_exit_code() {
    assert_eq!(shell_worker("exit 0").run().await.expect("run"), 0);
    assert_eq!(shell_worker("exit 42").run().await.expect("run"), 42);
}

#[cfg(unix)]
#[tokio::test]
async fn test_signalled_worker_maps_to_one() {
    assert_eq!(shell_worker("kill -9 $$").run().await.expect("run"), 1);
}

#[tokio::test]
async fn test_missing_worker_binary_is_an_error() {
    let supervisor = WorkerSupervisor::new(
        PathBuf::from("/nonexistent/shellgate-worker"),
        Vec::new(),
        87,
    );
    let err = supervisor.run().await.expect_err("spawn fails");
    assert!(err.to_string().contains("failed to spawn worker"), "{err}");
}

#[tokio::test]
async fn test_forward_lines_keeps_raw_bytes() {
    let input: &[u8] = b"a\r\n\xffb\nc";
    let mut out = Vec::new();
    forward_lines(input, &mut out).await.expect("forward");
    assert_eq!(out, input);
}
