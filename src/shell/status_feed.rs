use log::debug;
use uuid::Uuid;

use crate::models::StatusItem;
use crate::sim::{EventSender, PlaybackStep, StatusPlayback};

/// The status list and, while one is being watched, its viewer.
#[derive(Default)]
pub struct StatusFeed {
    viewer: Option<StatusPlayback>,
}

impl StatusFeed {
    pub fn new() -> Self {
        StatusFeed { viewer: None }
    }

    /// Opens the viewer for `item`, replacing any viewer already open.
    pub fn open(&mut self, item: StatusItem, events: &EventSender) {
        self.viewer = Some(StatusPlayback::open(item, events));
    }

    pub fn close(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            debug!("Closing status viewer for {}", viewer.item().contact);
        }
    }

    pub fn viewer(&self) -> Option<&StatusPlayback> {
        self.viewer.as_ref()
    }

    /// Progress of the open viewer; 0 when nothing is playing.
    pub fn progress(&self) -> u8 {
        self.viewer.as_ref().map_or(0, StatusPlayback::progress)
    }

    pub fn handle_tick(&mut self, viewer_id: Uuid) -> bool {
        let step = match self.viewer.as_mut() {
            Some(viewer) if viewer.id() == viewer_id => viewer.advance(),
            _ => return false,
        };
        if step == PlaybackStep::Finished {
            self.close();
        }
        true
    }
}
