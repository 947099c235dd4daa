use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::sim::notifications::request_permission;
use crate::sim::{EventSender, NotificationError, PermissionPrompt, ScopedTask};

/// What a native integration would add; shown on the panel only.
pub const INTEGRATION_FEATURES: &[&str] = &[
    "Desktop notification daemon support",
    "Background notification handling",
    "Deep linking to specific chats",
];

pub const NEXT_STEPS: &[&str] = &[
    "1. Pick a notification backend for the target desktop",
    "2. Request permission on first launch",
    "3. Forward incoming messages while the app is in the background",
    "4. Open the matching chat when a notification is clicked",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Disabled,
    Requesting(Uuid),
    Enabled,
}

pub struct NotificationSetup {
    state: PermissionState,
    prompt: Arc<dyn PermissionPrompt>,
    pending: Option<ScopedTask>,
}

impl NotificationSetup {
    pub fn new(prompt: Arc<dyn PermissionPrompt>) -> Self {
        NotificationSetup {
            state: PermissionState::Disabled,
            prompt,
            pending: None,
        }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == PermissionState::Enabled
    }

    /// Starts a permission request. Does nothing while one is in flight or
    /// once notifications are already on.
    pub fn request(&mut self, events: &EventSender) -> bool {
        if self.state != PermissionState::Disabled {
            debug!("Permission request ignored in state {:?}", self.state);
            return false;
        }
        let request_id = Uuid::new_v4();
        self.pending = Some(request_permission(self.prompt.clone(), request_id, events));
        self.state = PermissionState::Requesting(request_id);
        true
    }

    /// Applies the prompt's answer. Returns None when the answer belongs to
    /// a request that is no longer pending.
    pub fn resolve(
        &mut self,
        request_id: Uuid,
        result: Result<(), NotificationError>,
    ) -> Option<Result<(), NotificationError>> {
        if self.state != PermissionState::Requesting(request_id) {
            return None;
        }
        self.pending = None;
        self.state = match &result {
            Ok(()) => {
                info!("Notifications enabled");
                PermissionState::Enabled
            }
            Err(_) => PermissionState::Disabled,
        };
        Some(result)
    }
}
