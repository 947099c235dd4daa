// Loading mock data from disk

mod common;
use common::setup_logging;

use std::io::Write;

use murmur::{MockData, MockDataError, Shell};

#[test]
fn test_load_override_file() {
    setup_logging();

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"{{
            "contacts": [
                {{"id": "a", "name": "Ada Lovelace", "last_message": "Notes attached", "timestamp": "9:00 AM", "unread": 3, "is_online": true}}
            ],
            "messages": {{
                "a": [{{"id": "1", "text": "Notes attached", "timestamp": "9:00 AM", "is_sent": false, "status": "read"}}]
            }}
        }}"#
    )
    .unwrap();

    let data = MockData::from_path(file.path()).expect("override file should load");
    assert_eq!(data.contacts.len(), 1);
    assert!(data.calls.is_empty());
    assert!(data.statuses.is_empty());
    assert_eq!(data.messages_for("a").len(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    assert!(matches!(MockData::from_path(&missing), Err(MockDataError::Io(_))));
}

#[tokio::test]
async fn test_shell_over_custom_data() {
    setup_logging();
    let data = MockData::from_json(
        r#"{"contacts": [{"id": "x", "name": "Grace Hopper", "last_message": "", "timestamp": ""}]}"#,
    )
    .unwrap();

    let (mut shell, _rx) = Shell::new(data, Some("x"));
    assert_eq!(shell.selected_contact().map(|c| c.name.as_str()), Some("Grace Hopper"));
    assert!(shell.messages().is_empty());

    // A chat without history still accepts messages
    assert!(shell.send_message("hello"));
    assert_eq!(shell.messages().len(), 1);
}
