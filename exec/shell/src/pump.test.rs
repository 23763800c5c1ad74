use std::io::Cursor;

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_drain_keeps_line_terminators() {
    let buffer = OutputBuffer::new();
    drain(Cursor::new("one\ntwo\r\nthree"), &buffer);

    assert_eq!(buffer.text(), "one\ntwo\r\nthree");
}

#[test]
fn test_drain_replaces_invalid_utf8() {
    let buffer = OutputBuffer::new();
    drain(Cursor::new(b"ok\n\xff\xfe bad\n".to_vec()), &buffer);

    assert_eq!(buffer.text(), "ok\n\u{fffd}\u{fffd} bad\n");
}

#[test]
fn test_empty_stream() {
    let buffer = OutputBuffer::new();
    drain(Cursor::new(""), &buffer);
    assert_eq!(buffer.text(), "");
}

#[test]
fn test_buffer_clones_share_storage() {
    let buffer = OutputBuffer::new();
    let writer = buffer.clone();
    writer.push("a\n".to_string());
    writer.push("b\n".to_string());
    assert_eq!(buffer.text(), "a\nb\n");
}

#[tokio::test]
async fn test_pump_finishes_at_eof() {
    let buffer = OutputBuffer::new();
    let pump = OutputPump::start(Cursor::new("x\ny\n"), buffer.clone());

    assert!(pump.finish(Duration::from_secs(5)).await);
    assert_eq!(buffer.text(), "x\ny\n");
}

#[tokio::test]
async fn test_pump_finish_is_bounded_while_stream_is_open() {
    let (reader, writer) = std::io::pipe().expect("pipe");
    let buffer = OutputBuffer::new();
    let pump = OutputPump::start(reader, buffer.clone());

    assert!(!pump.finish(Duration::from_millis(100)).await);
    drop(writer);
}

#[tokio::test]
async fn test_abandoned_pump_ends_when_writer_closes() {
    use std::io::Write;

    let (reader, mut writer) = std::io::pipe().expect("pipe");
    let buffer = OutputBuffer::new();
    let pump = OutputPump::start(reader, buffer.clone());
    assert!(!pump.finish(Duration::from_millis(50)).await);

    writer.write_all(b"late\n").expect("write");
    drop(writer);

    // The reader thread keeps draining until EOF, then drops its clone.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while Arc::strong_count(&buffer.lines) > 1 {
        assert!(std::time::Instant::now() < deadline, "reader never released");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(buffer.text(), "late\n");
}
