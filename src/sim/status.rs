use log::debug;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use super::{post, EventSender, ScopedTask, SimEvent};
use crate::models::StatusItem;

pub const PROGRESS_TICK: Duration = Duration::from_millis(100);
pub const PROGRESS_STEP: u8 = 2;
pub const PROGRESS_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStep {
    Advanced(u8),
    Finished,
}

/// Full-screen playback of one status update with its auto-advancing bar.
pub struct StatusPlayback {
    id: Uuid,
    item: StatusItem,
    progress: u8,
    _ticker: ScopedTask,
}

impl StatusPlayback {
    pub fn open(item: StatusItem, events: &EventSender) -> Self {
        let id = Uuid::new_v4();
        debug!("Opening status {} from {}", item.id, item.contact);

        let tx = events.clone();
        let ticker = ScopedTask::spawn("status progress ticker", async move {
            loop {
                sleep(PROGRESS_TICK).await;
                if !post(&tx, SimEvent::StatusTick { viewer_id: id }).await {
                    break;
                }
            }
        });

        StatusPlayback {
            id,
            item,
            progress: 0,
            _ticker: ticker,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn item(&self) -> &StatusItem {
        &self.item
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// One tick of the bar. The tick that finds the bar already full ends
    /// playback, so a full bar is shown for one period before closing.
    pub fn advance(&mut self) -> PlaybackStep {
        if self.progress >= PROGRESS_MAX {
            return PlaybackStep::Finished;
        }
        self.progress = (self.progress + PROGRESS_STEP).min(PROGRESS_MAX);
        PlaybackStep::Advanced(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::channel;

    fn item() -> StatusItem {
        StatusItem {
            id: "2".to_string(),
            contact: "Sarah Wilson".to_string(),
            avatar: None,
            timestamp: "2 hours ago".to_string(),
            viewed: false,
            is_own: false,
        }
    }

    #[tokio::test]
    async fn test_advance_to_finish() {
        let (tx, _rx) = channel();
        let mut playback = StatusPlayback::open(item(), &tx);
        assert_eq!(playback.progress(), 0);

        assert_eq!(playback.advance(), PlaybackStep::Advanced(2));
        for _ in 1..50 {
            playback.advance();
        }
        assert_eq!(playback.progress(), 100);
        assert_eq!(playback.advance(), PlaybackStep::Finished);
    }
}
