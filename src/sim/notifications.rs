// Mocked notification permission flow. Nothing here talks to a desktop
// notification service; the prompt is a seam where one could be plugged in.

use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use super::{post, EventSender, ScopedTask, SimEvent};

pub const PERMISSION_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Notification permission denied")]
    Denied,

    #[error("Notifications unavailable: {0}")]
    Unavailable(String),
}

pub trait PermissionPrompt: Send + Sync {
    fn request(&self) -> Result<(), NotificationError>;
}

/// Always grants.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedPrompt;

impl PermissionPrompt for SimulatedPrompt {
    fn request(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Asks `prompt` for permission after the simulated delay and posts the answer.
pub fn request_permission(
    prompt: Arc<dyn PermissionPrompt>,
    request_id: Uuid,
    events: &EventSender,
) -> ScopedTask {
    let tx = events.clone();
    ScopedTask::spawn("notification permission request", async move {
        sleep(PERMISSION_DELAY).await;
        let result = prompt.request();
        match &result {
            Ok(()) => info!("Notification permission granted"),
            Err(e) => warn!("Notification permission request failed: {}", e),
        }
        post(&tx, SimEvent::PermissionResolved { request_id, result }).await;
    })
}
