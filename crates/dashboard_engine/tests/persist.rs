use std::fs;

use dashboard_engine::{ensure_output_dir, PagePublisher, DEFAULT_PAGE_FILENAME};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn publish_replaces_previous_page() {
    let temp = TempDir::new().unwrap();
    let publisher = PagePublisher::new(temp.path().join("site"));

    let first = publisher.publish("<p>one</p>").unwrap();
    assert_eq!(first.file_name().unwrap(), DEFAULT_PAGE_FILENAME);
    assert_eq!(fs::read_to_string(&first).unwrap(), "<p>one</p>");

    let second = publisher.publish("<p>two</p>").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "<p>two</p>");

    let leftovers = fs::read_dir(temp.path().join("site")).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn publish_fails_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let publisher = PagePublisher::with_filename(file_path.clone(), "index.html");
    assert!(publisher.publish("data").is_err());
    assert!(!file_path.with_file_name("index.html").exists());
}
