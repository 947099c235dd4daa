// Static sample records standing in for a backend.
//
// The tables ship embedded in the binary as JSON and can be swapped for a
// local file with the same shape.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CallPeer, CallRecord, Contact, Message, StatusItem};

const BUILTIN_MOCK_DATA: &str = include_str!("../data/mock_data.json");

/// Errors that can occur while loading mock data
#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("Failed to read mock data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse mock data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid mock data: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockData {
    pub contacts: Vec<Contact>,
    /// Chat id -> conversation
    #[serde(default)]
    pub messages: BTreeMap<String, Vec<Message>>,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
    #[serde(default)]
    pub statuses: Vec<StatusItem>,
}

impl MockData {
    /// The sample set compiled into the binary.
    pub fn builtin() -> Result<Self, MockDataError> {
        Self::from_json(BUILTIN_MOCK_DATA)
    }

    pub fn from_json(json: &str) -> Result<Self, MockDataError> {
        let data: MockData = serde_json::from_str(json)?;
        data.validate()?;
        debug!(
            "Parsed mock data: {} contacts, {} conversations, {} calls, {} statuses",
            data.contacts.len(),
            data.messages.len(),
            data.calls.len(),
            data.statuses.len()
        );
        Ok(data)
    }

    pub fn from_path(path: &Path) -> Result<Self, MockDataError> {
        let contents = fs::read_to_string(path)?;
        let data = Self::from_json(&contents)?;
        info!("Loaded mock data from {}", path.display());
        Ok(data)
    }

    fn validate(&self) -> Result<(), MockDataError> {
        let mut seen = HashSet::new();
        for contact in &self.contacts {
            if !seen.insert(contact.id.as_str()) {
                return Err(MockDataError::Invalid(format!(
                    "duplicate contact id '{}'",
                    contact.id
                )));
            }
        }

        if let Some(orphan) = self.messages.keys().find(|id| !seen.contains(id.as_str())) {
            return Err(MockDataError::Invalid(format!(
                "conversation '{}' has no matching contact",
                orphan
            )));
        }

        Ok(())
    }

    pub fn contact(&self, chat_id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == chat_id)
    }

    pub fn contact_by_name(&self, name: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.name == name)
    }

    /// Static conversation for a chat; empty when the chat has no table.
    pub fn messages_for(&self, chat_id: &str) -> &[Message] {
        self.messages
            .get(chat_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolves a display name to a call peer, attaching the contact id when known.
    pub fn peer_for(&self, name: &str) -> CallPeer {
        match self.contact_by_name(name) {
            Some(contact) => CallPeer {
                contact_id: Some(contact.id.clone()),
                name: contact.name.clone(),
                avatar: contact.avatar.clone(),
            },
            None => CallPeer {
                contact_id: None,
                name: name.to_string(),
                avatar: None,
            },
        }
    }

    pub fn own_statuses(&self) -> impl Iterator<Item = &StatusItem> {
        self.statuses.iter().filter(|s| s.is_own)
    }

    pub fn recent_statuses(&self) -> impl Iterator<Item = &StatusItem> {
        self.statuses.iter().filter(|s| !s.is_own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallDirection, CallKind, DeliveryStatus};

    #[test]
    fn test_builtin_tables() {
        let data = MockData::builtin().expect("builtin data should parse");

        assert_eq!(data.contacts.len(), 4);
        assert_eq!(data.messages.len(), 4);
        assert_eq!(data.calls.len(), 6);
        assert_eq!(data.statuses.len(), 5);

        let sarah = data.contact("1").unwrap();
        assert_eq!(sarah.name, "Sarah Wilson");
        assert_eq!(sarah.unread, 2);
        assert!(sarah.is_online);
        assert!(!data.contact("2").unwrap().is_online);

        let first = &data.messages_for("1")[0];
        assert_eq!(first.text, "Hey! How are you doing today?");
        assert!(!first.is_sent);
        assert_eq!(first.status, Some(DeliveryStatus::Read));

        let missed = &data.calls[2];
        assert_eq!(missed.contact, "Mom");
        assert_eq!(missed.kind, CallKind::Audio);
        assert_eq!(missed.direction, CallDirection::Missed);
        assert_eq!(missed.duration, None);
    }

    #[test]
    fn test_status_sections() {
        let data = MockData::builtin().unwrap();

        let own: Vec<_> = data.own_statuses().map(|s| s.contact.as_str()).collect();
        assert_eq!(own, vec!["My Status"]);

        let recent: Vec<_> = data.recent_statuses().map(|s| s.id.as_str()).collect();
        assert_eq!(recent, vec!["2", "3", "4", "5"]);
    }

    #[test]
    fn test_unknown_chat_has_no_messages() {
        let data = MockData::builtin().unwrap();
        assert!(data.messages_for("42").is_empty());
    }

    #[test]
    fn test_peer_lookup() {
        let data = MockData::builtin().unwrap();

        let known = data.peer_for("Mom");
        assert_eq!(known.contact_id.as_deref(), Some("4"));

        let stranger = data.peer_for("Someone Else");
        assert_eq!(stranger.contact_id, None);
        assert_eq!(stranger.name, "Someone Else");
    }

    #[test]
    fn test_duplicate_contact_rejected() {
        let json = r#"{
            "contacts": [
                {"id": "1", "name": "A", "last_message": "", "timestamp": ""},
                {"id": "1", "name": "B", "last_message": "", "timestamp": ""}
            ]
        }"#;

        match MockData::from_json(json) {
            Err(MockDataError::Invalid(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_orphan_conversation_rejected() {
        let json = r#"{
            "contacts": [{"id": "1", "name": "A", "last_message": "", "timestamp": ""}],
            "messages": {"9": []}
        }"#;

        assert!(matches!(
            MockData::from_json(json),
            Err(MockDataError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MockData::from_json("{ not json"),
            Err(MockDataError::Parse(_))
        ));
    }
}
