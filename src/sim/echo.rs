use tokio::time::{sleep, Duration};
use uuid::Uuid;

use super::{post, EventSender, ScopedTask, SimEvent};
use crate::models::{clock_label, DeliveryStatus, Message};

pub const AUTO_REPLY_DELAY: Duration = Duration::from_secs(2);
pub const AUTO_REPLY_TEXT: &str = "Thanks for your message! I'll get back to you soon.";

pub fn outgoing_message(text: &str) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        timestamp: clock_label(),
        is_sent: true,
        status: Some(DeliveryStatus::Sent),
    }
}

pub fn auto_reply() -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        text: AUTO_REPLY_TEXT.to_string(),
        timestamp: clock_label(),
        is_sent: false,
        status: Some(DeliveryStatus::Delivered),
    }
}

/// Posts the canned reply for `conversation_id` once the delay elapses.
pub fn schedule_auto_reply(conversation_id: Uuid, events: &EventSender) -> ScopedTask {
    let tx = events.clone();
    ScopedTask::spawn("auto-reply timer", async move {
        sleep(AUTO_REPLY_DELAY).await;
        post(&tx, SimEvent::AutoReply { conversation_id, message: auto_reply() }).await;
    })
}
