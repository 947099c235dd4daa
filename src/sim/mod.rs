// Timer-driven simulation of the things a real messenger would get from a
// server: call progress, status playback, auto replies and the notification
// permission prompt.
//
// Timers run as tokio tasks and never touch UI state directly. They post a
// `SimEvent` tagged with the id of the session that scheduled them, and the
// shell applies it on its own loop.

pub mod call;
pub mod echo;
pub mod notifications;
pub mod status;
pub mod timer;

use log::debug;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::Message;

pub use call::{CallSession, CallStatus};
pub use notifications::{NotificationError, PermissionPrompt, SimulatedPrompt};
pub use status::{PlaybackStep, StatusPlayback};
pub use timer::ScopedTask;

pub const EVENT_CHANNEL_CAPACITY: usize = 100;

pub type EventSender = mpsc::Sender<SimEvent>;
pub type EventReceiver = mpsc::Receiver<SimEvent>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    CallStatus { call_id: Uuid, status: CallStatus },
    CallTick { call_id: Uuid },
    StatusTick { viewer_id: Uuid },
    AutoReply { conversation_id: Uuid, message: Message },
    PermissionResolved {
        request_id: Uuid,
        result: Result<(), NotificationError>,
    },
}

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Sends an event to the shell. Returns false once the receiver is gone so
/// periodic timers can stop.
pub(crate) async fn post(events: &EventSender, event: SimEvent) -> bool {
    match events.send(event).await {
        Ok(()) => true,
        Err(e) => {
            debug!("Event receiver closed, dropping {:?}", e.0);
            false
        }
    }
}
