use tokio::sync::mpsc;
use tokio::time::Instant;

use super::*;
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct RecordingExit {
    tx: mpsc::UnboundedSender<(i32, Instant)>,
}

fn recording() -> (Arc<RecordingExit>, mpsc::UnboundedReceiver<(i32, Instant)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(RecordingExit { tx }), rx)
}

impl ExitAction for RecordingExit {
    fn exit(&self, code: i32) {
        let _ = self.tx.send((code, Instant::now()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_request_returns_before_exit() {
    let (action, mut rx) = recording();
    let signal = RestartSignal::with_action(Duration::from_millis(200), 87, action);

    let started = Instant::now();
    assert_eq!(signal.request(), RESTART_CONFIRMATION);
    assert!(signal.requested.load(Ordering::SeqCst));
    assert!(rx.try_recv().is_err());

    let (code, at) = rx.recv().await.expect("exit fired");
    assert_eq!(code, 87);
    assert!(at - started >= Duration::from_millis(200));
    assert!(at - started < Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_requests_exit_once() {
    let (action, mut rx) = recording();
    let signal = RestartSignal::with_action(Duration::from_millis(50), 42, action);

    assert_eq!(signal.request(), RESTART_CONFIRMATION);
    assert_eq!(signal.clone().request(), RESTART_CONFIRMATION);

    assert_eq!(rx.recv().await.map(|(code, _)| code), Some(42));
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_from_config() {
    let config = GatewayConfig {
        restart_delay_ms: 10,
        restart_exit_code: 3,
        ..Default::default()
    };
    let signal = RestartSignal::from_config(&config);
    assert_eq!(signal.delay, Duration::from_millis(10));
    assert_eq!(signal.exit_code, 3);
    assert!(!signal.requested.load(Ordering::SeqCst));
}
