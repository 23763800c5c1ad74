use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn path_in(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_write_then_read_returns_same_content() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "notes.txt");
    let content = "line one\nline two\r\n\tend";

    let reply = file_edit(&path, Some(content)).await;
    assert_eq!(reply, format!("Successfully wrote to '{path}'."));

    assert_eq!(file_edit(&path, None).await, content);
}

#[tokio::test]
async fn test_write_overwrites_existing_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "config.ini");
    std::fs::write(&path, "old contents that are longer").expect("seed");

    file_edit(&path, Some("new")).await;
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "new");
}

#[tokio::test]
async fn test_read_missing_file_is_an_error_string() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "missing.txt");

    assert_eq!(
        file_edit(&path, None).await,
        format!("Error: File '{path}' does not exist.")
    );
}

#[tokio::test]
async fn test_write_into_missing_directory_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "no/such/dir/file.txt");

    let reply = file_edit(&path, Some("x")).await;
    assert!(reply.starts_with("Exception: "), "{reply}");
}

#[tokio::test]
async fn test_read_directory_is_reported_missing() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().to_string_lossy().into_owned();

    let reply = file_edit(&path, None).await;
    assert_eq!(reply, format!("Error: File '{path}' does not exist."));
}

#[tokio::test]
async fn test_read_undecodable_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "binary.dat");
    std::fs::write(&path, b"\xff\xfe\x00").expect("seed");

    let reply = file_edit(&path, None).await;
    assert!(reply.starts_with("Exception: "), "{reply}");
}

#[tokio::test]
async fn test_empty_content_truncates() {
    let dir = TempDir::new().expect("tempdir");
    let path = path_in(&dir, "empty.txt");
    std::fs::write(&path, "something").expect("seed");

    file_edit(&path, Some("")).await;
    assert_eq!(file_edit(&path, None).await, "");
}
