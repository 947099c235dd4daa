use log::{debug, info};
use uuid::Uuid;

use crate::mock_data::MockData;
use crate::models::Message;
use crate::sim::echo::{outgoing_message, schedule_auto_reply};
use crate::sim::{EventSender, ScopedTask};

/// Messages of the open chat plus the auto replies still on their way.
///
/// Each time a chat is opened the list is reloaded from the static table and
/// a new session id is taken. Replies scheduled for an older session are
/// cancelled, and any that were already queued are rejected by id.
pub struct Conversation {
    chat_id: Option<String>,
    session: Uuid,
    messages: Vec<Message>,
    pending_replies: Vec<ScopedTask>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Conversation {
            chat_id: None,
            session: Uuid::new_v4(),
            messages: Vec::new(),
            pending_replies: Vec::new(),
        }
    }

    pub fn open(&mut self, chat_id: Option<&str>, data: &MockData) {
        self.chat_id = chat_id.map(str::to_string);
        self.session = Uuid::new_v4();
        self.messages = chat_id
            .map(|id| data.messages_for(id).to_vec())
            .unwrap_or_default();
        if !self.pending_replies.is_empty() {
            debug!("Dropping {} pending auto replies", self.pending_replies.len());
        }
        self.pending_replies.clear();
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_replies(&self) -> usize {
        self.pending_replies.iter().filter(|t| !t.is_finished()).count()
    }

    /// Appends a trimmed outgoing message and schedules the canned reply.
    /// Blank input, or no open chat, appends nothing.
    pub fn send(&mut self, text: &str, events: &EventSender) -> Option<&Message> {
        let text = text.trim();
        if text.is_empty() || self.chat_id.is_none() {
            return None;
        }

        self.pending_replies.retain(|t| !t.is_finished());
        self.pending_replies.push(schedule_auto_reply(self.session, events));

        info!("Sending message to chat {}", self.chat_id.as_deref().unwrap_or_default());
        self.messages.push(outgoing_message(text));
        self.messages.last()
    }

    pub fn receive_reply(&mut self, conversation_id: Uuid, message: Message) -> bool {
        if conversation_id != self.session {
            debug!("Ignoring auto reply for a closed conversation");
            return false;
        }
        self.messages.push(message);
        true
    }
}
