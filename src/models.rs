use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub last_message: String,
    pub timestamp: String,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub is_online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub timestamp: String,
    pub is_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent = 1,      // Accepted locally
    Delivered = 2, // Reached the other side
    Read = 3,      // Seen by the other side
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Audio,
    Video,
}

impl CallKind {
    pub fn label(&self) -> &'static str {
        match self {
            CallKind::Audio => "Voice Call",
            CallKind::Video => "Video Call",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Incoming,
    Outgoing,
    Missed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub kind: CallKind,
    pub direction: CallDirection,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusItem {
    pub id: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub is_own: bool,
}

/// The other side of a simulated call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPeer {
    /// Chat id when the peer is a known contact
    pub contact_id: Option<String>,
    pub name: String,
    pub avatar: Option<String>,
}

/// Initials shown wherever an avatar image would be ("Sarah Wilson" -> "SW").
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Formats elapsed call seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Wall-clock label for freshly created messages ("02:30 PM").
pub fn clock_label() -> String {
    chrono::Local::now().format("%I:%M %p").to_string()
}
