use super::*;
use pretty_assertions::assert_eq;

#[cfg(unix)]
mod unix_tests {
    use std::io::BufRead;
    use std::io::BufReader;
    use std::io::Read;
    use std::sync::Mutex;
    use std::time::Instant;

    use pretty_assertions::assert_eq;

    use super::*;

    fn runner() -> ProcessRunner {
        ProcessRunner::new(Duration::from_secs(2))
    }

    fn read_all(handle: &mut ProcessHandle) -> String {
        let mut reader = handle.take_output().expect("output stream");
        let mut out = String::new();
        reader.read_to_string(&mut out).expect("read output");
        out
    }

    /// Delegates to the real platform group and records which escalation
    /// steps were taken.
    #[derive(Debug, Default)]
    struct RecordingGroup {
        soft_succeeds: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingGroup {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("lock").clone()
        }
    }

    impl ProcessGroup for RecordingGroup {
        fn shell_command(&self, command: &str) -> Command {
            PlatformProcessGroup.shell_command(command)
        }

        fn soft_interrupt(&self, pid: u32) -> bool {
            self.calls.lock().expect("lock").push("soft");
            self.soft_succeeds && PlatformProcessGroup.soft_interrupt(pid)
        }

        fn hard_kill_tree(&self, pid: u32) {
            self.calls.lock().expect("lock").push("hard");
            PlatformProcessGroup.hard_kill_tree(pid);
        }
    }

    #[tokio::test]
    async fn test_spawn_captures_stdout() {
        let runner = runner();
        let mut handle = runner.spawn("echo hello").expect("spawn");
        assert!(handle.pid().is_some());

        assert_eq!(read_all(&mut handle), "hello\n");
        assert_eq!(runner.wait(&mut handle).await, Some(0));
        assert!(handle.take_output().is_none());
    }

    #[tokio::test]
    async fn test_stderr_shares_the_stream() {
        let runner = runner();
        let mut handle = runner
            .spawn("echo first; echo second 1>&2; echo third")
            .expect("spawn");

        assert_eq!(read_all(&mut handle), "first\nsecond\nthird\n");
        assert_eq!(runner.wait(&mut handle).await, Some(0));
    }

    #[tokio::test]
    async fn test_stdin_is_closed() {
        let runner = runner();
        let mut handle = runner.spawn("cat").expect("spawn");

        assert_eq!(read_all(&mut handle), "");
        assert_eq!(runner.wait(&mut handle).await, Some(0));
    }

    #[tokio::test]
    async fn test_exit_codes() {
        let runner = runner();

        let mut handle = runner.spawn("exit 3").expect("spawn");
        assert_eq!(runner.wait(&mut handle).await, Some(3));

        let mut handle = runner.spawn("kill -9 $$").expect("spawn");
        assert_eq!(runner.wait(&mut handle).await, Some(-9));
    }

    #[tokio::test]
    async fn test_poll_reports_running_then_exited() {
        let runner = runner();
        let mut handle = runner.spawn("sleep 0.3").expect("spawn");
        assert_eq!(runner.poll(&mut handle), ProcessState::Running);

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match runner.poll(&mut handle) {
                ProcessState::Exited(code) => {
                    assert_eq!(code, Some(0));
                    break;
                }
                ProcessState::Running => {
                    assert!(Instant::now() < deadline, "process never exited");
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_soft_interrupt_stops_cooperative_process() {
        let group = Arc::new(RecordingGroup {
            soft_succeeds: true,
            ..Default::default()
        });
        let runner = ProcessRunner::with_group(group.clone(), Duration::from_secs(2));
        let mut handle = runner.spawn("sleep 30").expect("spawn");

        runner.terminate_tree(&mut handle).await;

        assert_eq!(group.calls(), vec!["soft", "hard"]);
        assert_eq!(runner.wait(&mut handle).await, Some(-libc::SIGTERM));
    }

    #[tokio::test]
    async fn test_kill_reaches_descendants_ignoring_soft_interrupt() {
        let group = Arc::new(RecordingGroup {
            soft_succeeds: true,
            ..Default::default()
        });
        let runner = ProcessRunner::with_group(group.clone(), Duration::from_secs(2));
        // The leader dies on SIGTERM; the subshell and its sleep ignore it.
        let mut handle = runner
            .spawn("(trap '' TERM; echo ready; sleep 30); echo done")
            .expect("spawn");
        let mut reader = BufReader::new(handle.take_output().expect("output stream"));
        let mut ready = String::new();
        reader.read_line(&mut ready).expect("read ready");
        assert_eq!(ready, "ready\n");

        runner.terminate_tree(&mut handle).await;

        assert_eq!(group.calls(), vec!["soft", "hard"]);
        assert_eq!(runner.wait(&mut handle).await, Some(-libc::SIGTERM));

        // The surviving sleep would hold the write end open.
        let drained = tokio::task::spawn_blocking(move || {
            let mut rest = String::new();
            reader.read_to_string(&mut rest).map(|_| rest)
        });
        let rest = tokio::time::timeout(Duration::from_secs(5), drained)
            .await
            .expect("descendant survived termination")
            .expect("join")
            .expect("read");
        assert_eq!(rest, "");
    }

    #[tokio::test]
    async fn test_escalates_when_soft_interrupt_is_ignored() {
        let group = Arc::new(RecordingGroup {
            soft_succeeds: true,
            ..Default::default()
        });
        let runner = ProcessRunner::with_group(group.clone(), Duration::from_millis(200));
        let mut handle = runner.spawn("trap '' TERM; sleep 30").expect("spawn");
        // Let the shell install its trap before signalling.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        runner.terminate_tree(&mut handle).await;

        assert_eq!(group.calls(), vec!["soft", "hard"]);
        assert_eq!(runner.wait(&mut handle).await, Some(-libc::SIGKILL));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_failed_soft_interrupt_goes_straight_to_kill() {
        let group = Arc::new(RecordingGroup::default());
        let runner = ProcessRunner::with_group(group.clone(), Duration::from_secs(30));
        let mut handle = runner.spawn("sleep 30").expect("spawn");

        let started = Instant::now();
        runner.terminate_tree(&mut handle).await;

        assert_eq!(group.calls(), vec!["soft", "hard"]);
        assert_eq!(runner.wait(&mut handle).await, Some(-libc::SIGKILL));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_terminate_reaches_grandchildren() {
        let runner = runner();
        let mut handle = runner.spawn("sleep 30 & echo $!; wait").expect("spawn");
        let mut reader = BufReader::new(handle.take_output().expect("output stream"));

        let mut grandchild = String::new();
        reader.read_line(&mut grandchild).expect("read pid");
        assert!(grandchild.trim().parse::<u32>().is_ok(), "got {grandchild:?}");

        runner.terminate_tree(&mut handle).await;
        runner.wait(&mut handle).await;

        // The background sleep holds the write end; EOF means it is gone.
        let drained = tokio::task::spawn_blocking(move || {
            let mut rest = String::new();
            reader.read_to_string(&mut rest).map(|_| rest)
        });
        let rest = tokio::time::timeout(Duration::from_secs(5), drained)
            .await
            .expect("grandchild survived termination")
            .expect("join")
            .expect("read");
        assert_eq!(rest, "");
    }

    #[tokio::test]
    async fn test_terminate_after_exit_is_harmless() {
        let runner = runner();
        let mut handle = runner.spawn("true").expect("spawn");
        assert_eq!(runner.wait(&mut handle).await, Some(0));

        runner.terminate_tree(&mut handle).await;
        assert_eq!(runner.poll(&mut handle), ProcessState::Exited(Some(0)));
    }
}

#[test]
fn test_unknown_exit_code_sentinel() {
    assert_eq!(UNKNOWN_EXIT_CODE, -1);
}
