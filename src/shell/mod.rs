// The root of the application state: which chat is open, which overlay is
// up, and the glue that routes simulation events to the right component.

pub mod conversation;
pub mod notification_setup;
pub mod sidebar;
pub mod status_feed;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::mock_data::MockData;
use crate::models::{CallKind, CallRecord, Contact, Message, StatusItem};
use crate::sim::{
    self, CallSession, EventReceiver, EventSender, PermissionPrompt, SimEvent, SimulatedPrompt,
};

pub use conversation::Conversation;
pub use notification_setup::{NotificationSetup, PermissionState};
pub use sidebar::{Sidebar, SidebarTab};
pub use status_feed::StatusFeed;

/// Seconds a toast stays on screen.
pub const TOAST_TIMEOUT_SECS: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub destructive: bool,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(title: &str, description: &str) -> Self {
        Toast {
            title: title.to_string(),
            description: description.to_string(),
            destructive: false,
            created_at: Utc::now(),
        }
    }

    pub fn destructive(title: &str, description: &str) -> Self {
        Toast {
            destructive: true,
            ..Toast::new(title, description)
        }
    }
}

pub struct Shell {
    data: MockData,
    events: EventSender,
    pub sidebar: Sidebar,
    conversation: Conversation,
    call: Option<CallSession>,
    status_feed: StatusFeed,
    notifications: NotificationSetup,
    notification_panel_open: bool,
    toast: Option<Toast>,
}

impl Shell {
    /// Creates the shell and the receiver its timers report to. The caller
    /// feeds received events back through [`Shell::handle_event`].
    pub fn new(data: MockData, initial_chat: Option<&str>) -> (Self, EventReceiver) {
        Self::with_prompt(data, initial_chat, Arc::new(SimulatedPrompt))
    }

    pub fn with_prompt(
        data: MockData,
        initial_chat: Option<&str>,
        prompt: Arc<dyn PermissionPrompt>,
    ) -> (Self, EventReceiver) {
        let (events, rx) = sim::channel();
        let mut shell = Shell {
            data,
            events,
            sidebar: Sidebar::new(),
            conversation: Conversation::new(),
            call: None,
            status_feed: StatusFeed::new(),
            notifications: NotificationSetup::new(prompt),
            notification_panel_open: false,
            toast: None,
        };

        // An unknown id leaves the shell without a selection
        if let Some(chat_id) = initial_chat {
            shell.select_chat(chat_id);
        }

        (shell, rx)
    }

    pub fn data(&self) -> &MockData {
        &self.data
    }

    // ---- chats ----

    pub fn selected_chat(&self) -> Option<&str> {
        self.conversation.chat_id()
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected_chat().and_then(|id| self.data.contact(id))
    }

    /// Opens a chat, replacing the message list with that chat's static set.
    /// Selecting the chat that is already open keeps its messages and replies.
    pub fn select_chat(&mut self, chat_id: &str) -> bool {
        if self.data.contact(chat_id).is_none() {
            warn!("Cannot select unknown chat '{}'", chat_id);
            return false;
        }
        if self.selected_chat() == Some(chat_id) {
            debug!("Chat {} is already open", chat_id);
            return true;
        }
        info!("Chat changed to: {}", chat_id);
        self.conversation.open(Some(chat_id), &self.data);
        true
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn send_message(&mut self, text: &str) -> bool {
        self.conversation.send(text, &self.events).is_some()
    }

    pub fn filtered_contacts(&self) -> Vec<&Contact> {
        self.sidebar.filtered_contacts(&self.data)
    }

    pub fn recent_statuses(&self) -> Vec<&StatusItem> {
        self.data.recent_statuses().collect()
    }

    // ---- sidebar rows ----

    /// Number of selectable rows on the active tab.
    pub fn row_count(&self) -> usize {
        match self.sidebar.active_tab() {
            SidebarTab::Chats => self.filtered_contacts().len(),
            SidebarTab::Calls => self.data.calls.len(),
            SidebarTab::Status => self.data.recent_statuses().count(),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.row_count();
        self.sidebar.move_cursor(delta, len);
    }

    pub fn highlighted_contact(&self) -> Option<&Contact> {
        self.filtered_contacts().get(self.sidebar.cursor()).copied()
    }

    pub fn highlighted_call(&self) -> Option<&CallRecord> {
        self.data.calls.get(self.sidebar.cursor())
    }

    pub fn highlighted_status(&self) -> Option<&StatusItem> {
        self.data.recent_statuses().nth(self.sidebar.cursor())
    }

    /// Enter on a sidebar row: open the chat, call back, or view the status.
    pub fn activate_highlighted(&mut self) -> bool {
        match self.sidebar.active_tab() {
            SidebarTab::Chats => match self.highlighted_contact().map(|c| c.id.clone()) {
                Some(id) => self.select_chat(&id),
                None => false,
            },
            SidebarTab::Calls => self.call_highlighted(CallKind::Audio),
            SidebarTab::Status => match self.highlighted_status().map(|s| s.id.clone()) {
                Some(id) => self.open_status(&id),
                None => false,
            },
        }
    }

    // ---- calls ----

    pub fn active_call(&self) -> Option<&CallSession> {
        self.call.as_ref()
    }

    pub fn active_call_mut(&mut self) -> Option<&mut CallSession> {
        self.call.as_mut()
    }

    /// Opens the call overlay for `name`. An existing call is hung up first.
    pub fn start_call(&mut self, name: &str, kind: CallKind) {
        let peer = self.data.peer_for(name);
        self.call = None;
        self.call = Some(CallSession::start(peer, kind, &self.events));
    }

    pub fn call_highlighted(&mut self, kind: CallKind) -> bool {
        match self.highlighted_call().map(|r| r.contact.clone()) {
            Some(name) => {
                self.start_call(&name, kind);
                true
            }
            None => false,
        }
    }

    pub fn call_selected_chat(&mut self, kind: CallKind) -> bool {
        match self.selected_contact().map(|c| c.name.clone()) {
            Some(name) => {
                self.start_call(&name, kind);
                true
            }
            None => false,
        }
    }

    /// Hangs up. Dropping the session cancels its timers.
    pub fn end_call(&mut self) {
        self.call = None;
    }

    // ---- status ----

    pub fn status_feed(&self) -> &StatusFeed {
        &self.status_feed
    }

    pub fn open_status(&mut self, status_id: &str) -> bool {
        match self.data.statuses.iter().find(|s| s.id == status_id && !s.is_own) {
            Some(item) => {
                self.status_feed.open(item.clone(), &self.events);
                true
            }
            None => false,
        }
    }

    pub fn close_status(&mut self) {
        self.status_feed.close();
    }

    pub fn add_status(&mut self) {
        self.show_toast(Toast::new(
            "Add Status",
            "This would open the camera or gallery in a real app",
        ));
    }

    // ---- notifications ----

    pub fn notifications(&self) -> &NotificationSetup {
        &self.notifications
    }

    pub fn is_notification_panel_open(&self) -> bool {
        self.notification_panel_open
    }

    pub fn set_notification_panel_open(&mut self, open: bool) {
        self.notification_panel_open = open;
    }

    pub fn request_notifications(&mut self) -> bool {
        self.notifications.request(&self.events)
    }

    /// Shows a sample notification. Only available once enabled.
    pub fn test_notification(&mut self) -> bool {
        if !self.notifications.is_enabled() {
            return false;
        }
        self.show_toast(Toast::new("📱 Sarah Wilson", "Hey! Just got your message. Talk soon!"));
        true
    }

    // ---- toasts ----

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn show_toast(&mut self, toast: Toast) {
        debug!("Showing toast: {}", toast.title);
        self.toast = Some(toast);
    }

    pub fn clean_toasts(&mut self, timeout_secs: i64) {
        if let Some(toast) = &self.toast {
            if (Utc::now() - toast.created_at).num_seconds() >= timeout_secs {
                debug!("Auto-dismissing toast: {}", toast.title);
                self.toast = None;
            }
        }
    }

    // ---- events ----

    /// Applies one simulation event. Events from sessions that have since
    /// been closed are dropped and reported as not applied.
    pub fn handle_event(&mut self, event: SimEvent) -> bool {
        if let SimEvent::CallStatus { .. } | SimEvent::CallTick { .. } = &event {
            return self.call.as_mut().map_or(false, |call| call.apply(&event));
        }

        match event {
            SimEvent::CallStatus { .. } | SimEvent::CallTick { .. } => false,
            SimEvent::StatusTick { viewer_id } => self.status_feed.handle_tick(viewer_id),
            SimEvent::AutoReply { conversation_id, message } => {
                self.conversation.receive_reply(conversation_id, message)
            }
            SimEvent::PermissionResolved { request_id, result } => {
                match self.notifications.resolve(request_id, result) {
                    Some(Ok(())) => {
                        self.show_toast(Toast::new(
                            "Notifications Enabled!",
                            "You'll now receive real-time message notifications",
                        ));
                        true
                    }
                    Some(Err(e)) => {
                        debug!("Permission request resolved with error: {}", e);
                        self.show_toast(Toast::destructive(
                            "Permission Denied",
                            "Please enable notifications in your device settings",
                        ));
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Drains every event already waiting on `rx`. Returns how many applied.
    pub fn pump(&mut self, rx: &mut EventReceiver) -> usize {
        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            if self.handle_event(event) {
                applied += 1;
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_initial_selection() {
        let (shell, _rx) = Shell::new(MockData::builtin().unwrap(), Some("1"));
        assert_eq!(shell.selected_chat(), Some("1"));
        assert_eq!(shell.messages().len(), 4);

        let (shell, _rx) = Shell::new(MockData::builtin().unwrap(), Some("99"));
        assert_eq!(shell.selected_chat(), None);
        assert!(shell.messages().is_empty());
    }

    #[tokio::test]
    async fn test_toast_auto_dismiss() {
        let (mut shell, _rx) = Shell::new(MockData::builtin().unwrap(), None);

        shell.add_status();
        shell.clean_toasts(TOAST_TIMEOUT_SECS);
        assert_eq!(shell.toast().map(|t| t.title.as_str()), Some("Add Status"));

        if let Some(toast) = shell.toast.as_mut() {
            toast.created_at = Utc::now() - Duration::seconds(TOAST_TIMEOUT_SECS + 1);
        }
        shell.clean_toasts(TOAST_TIMEOUT_SECS);
        assert!(shell.toast().is_none());
    }

    #[tokio::test]
    async fn test_test_notification_requires_permission() {
        let (mut shell, _rx) = Shell::new(MockData::builtin().unwrap(), None);
        assert!(!shell.test_notification());
        assert!(shell.toast().is_none());
    }

    #[tokio::test]
    async fn test_own_status_cannot_be_opened() {
        let (mut shell, _rx) = Shell::new(MockData::builtin().unwrap(), None);
        assert!(!shell.open_status("1"));
        assert!(shell.status_feed().viewer().is_none());
    }
}
