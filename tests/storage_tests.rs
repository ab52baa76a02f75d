// On-disk storage tests

mod common;
use common::setup_logging;

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use mockchat::models::{Message, Sender};
use mockchat::seed::default_contacts;
use mockchat::storage::{ChatStore, FileStorage, KeyValueStore, StorageKeys, StoreError};

fn open_store(dir: &TempDir) -> Result<ChatStore> {
    let storage = FileStorage::open(&dir.path().join("storage.json"))?;
    Ok(ChatStore::new(Arc::new(storage), StorageKeys::default()))
}

#[test]
fn test_state_survives_reopen() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;

    {
        let store = open_store(&dir)?;
        store.seed_contacts_if_empty(&default_contacts())?;
        store.record_message("dennis", &Message::text(Sender::User, "hello"))?;
        store.set_selected_contact("dennis")?;
        store.set_dark_mode(true)?;
    }

    let store = open_store(&dir)?;
    assert_eq!(store.list_contacts()?.len(), default_contacts().len());
    let history = store.get_history("dennis")?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text_content(), Some("hello"));
    assert_eq!(store.find_contact("dennis")?.unwrap().last_message, "hello");
    assert_eq!(store.selected_contact()?, Some("dennis".to_string()));
    assert!(store.dark_mode()?);
    Ok(())
}

#[test]
fn test_file_layout_uses_web_key_names() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    let store = open_store(&dir)?;
    store.seed_contacts_if_empty(&default_contacts())?;
    store.append_message("gary", &Message::text(Sender::User, "hi dad"))?;

    let raw = std::fs::read_to_string(dir.path().join("storage.json"))?;
    let values: serde_json::Value = serde_json::from_str(&raw)?;
    let contacts: serde_json::Value = serde_json::from_str(values["chatContacts"].as_str().unwrap())?;
    assert_eq!(contacts[0]["id"], "aeolus");
    assert!(contacts[0].get("lastMessageTime").is_some());

    let history: serde_json::Value = serde_json::from_str(values["chatHistory"].as_str().unwrap())?;
    assert_eq!(history["gary"][0]["type"], "text");
    assert_eq!(history["gary"][0]["sender"], "user");
    Ok(())
}

/// Two handles on one file do not see each other's writes; whichever writes
/// last replaces the whole file.
#[test]
fn test_two_handles_last_writer_wins() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    let first = open_store(&dir)?;
    let second = open_store(&dir)?;

    first.append_message("dennis", &Message::text(Sender::User, "from first"))?;
    second.append_message("chloe", &Message::text(Sender::User, "from second"))?;

    let reopened = open_store(&dir)?;
    let map = reopened.load_history_map()?;
    assert!(map.contains_key("chloe"));
    assert!(!map.contains_key("dennis"), "earlier write should have been overwritten");
    Ok(())
}

#[test]
fn test_corrupt_value_is_reported() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    let store = open_store(&dir)?;
    store.backend().set("chatContacts", "{not json")?;

    match store.list_contacts() {
        Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, "chatContacts"),
        other => panic!("Expected a corrupt-value error, got {:?}", other),
    }
    // Other keys are unaffected
    assert!(store.get_history("dennis")?.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_file_fails_to_open() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "[1, 2")?;

    assert!(matches!(FileStorage::open(&path), Err(StoreError::Corrupt { .. })));
    Ok(())
}

#[test]
fn test_empty_file_opens_as_empty_store() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("storage.json"), "")?;

    let store = open_store(&dir)?;
    assert!(store.list_contacts()?.is_empty());
    assert!(store.load_history_map()?.is_empty());
    Ok(())
}

#[test]
fn test_custom_key_names() -> Result<()> {
    setup_logging();
    let dir = TempDir::new()?;
    let keys = StorageKeys {
        contacts: "people".to_string(),
        ..StorageKeys::default()
    };
    let storage = Arc::new(FileStorage::open(&dir.path().join("storage.json"))?);
    let store = ChatStore::new(storage.clone(), keys);
    store.seed_contacts_if_empty(&default_contacts())?;

    assert!(storage.get("people")?.is_some());
    assert!(storage.get("chatContacts")?.is_none());
    Ok(())
}
