use log::{debug, info};
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use super::{post, EventSender, ScopedTask, SimEvent};
use crate::models::{format_duration, CallKind, CallPeer};

/// Both delays are measured from the moment the call screen opens.
pub const RINGING_AFTER: Duration = Duration::from_secs(1);
pub const CONNECTED_AFTER: Duration = Duration::from_secs(3);
pub const DURATION_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CallStatus {
    Connecting,
    Ringing,
    Connected,
}

/// One simulated call, from the moment the overlay opens until hang-up.
///
/// Owns its timers: dropping the session stops the ring/connect chain and
/// the duration counter.
pub struct CallSession {
    id: Uuid,
    peer: CallPeer,
    kind: CallKind,
    status: CallStatus,
    elapsed_secs: u64,
    muted: bool,
    video_off: bool,
    _timers: Vec<ScopedTask>,
}

impl CallSession {
    pub fn start(peer: CallPeer, kind: CallKind, events: &EventSender) -> Self {
        let id = Uuid::new_v4();
        info!("Starting {:?} call {} with {}", kind, id, peer.name);

        let ring_tx = events.clone();
        let ring = ScopedTask::spawn("call ringing timer", async move {
            sleep(RINGING_AFTER).await;
            post(&ring_tx, SimEvent::CallStatus { call_id: id, status: CallStatus::Ringing }).await;
        });

        let connect_tx = events.clone();
        let connect = ScopedTask::spawn("call connect timer", async move {
            sleep(CONNECTED_AFTER).await;
            if !post(&connect_tx, SimEvent::CallStatus { call_id: id, status: CallStatus::Connected }).await {
                return;
            }
            loop {
                sleep(DURATION_TICK).await;
                if !post(&connect_tx, SimEvent::CallTick { call_id: id }).await {
                    break;
                }
            }
        });

        CallSession {
            id,
            peer,
            kind,
            status: CallStatus::Connecting,
            elapsed_secs: 0,
            muted: false,
            video_off: false,
            _timers: vec![ring, connect],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn peer(&self) -> &CallPeer {
        &self.peer
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_video_off(&self) -> bool {
        self.video_off
    }

    /// Applies a timer event addressed to this call. Returns false for events
    /// that belong to another call or would move the state backwards.
    pub fn apply(&mut self, event: &SimEvent) -> bool {
        match event {
            SimEvent::CallStatus { call_id, status } if *call_id == self.id => {
                if *status <= self.status {
                    return false;
                }
                debug!("Call {} is now {:?}", self.id, status);
                self.status = *status;
                true
            }
            SimEvent::CallTick { call_id } if *call_id == self.id => {
                if self.status != CallStatus::Connected {
                    return false;
                }
                self.elapsed_secs += 1;
                true
            }
            _ => false,
        }
    }

    pub fn status_text(&self) -> String {
        match self.status {
            CallStatus::Connecting => "Connecting...".to_string(),
            CallStatus::Ringing => "Ringing...".to_string(),
            CallStatus::Connected => format_duration(self.elapsed_secs),
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Only video calls have a camera to turn off; audio calls ignore this.
    pub fn toggle_video(&mut self) -> bool {
        if self.kind == CallKind::Video {
            self.video_off = !self.video_off;
        }
        self.video_off
    }

    /// Whether the placeholder for a live feed should be shown.
    pub fn shows_live_video(&self) -> bool {
        self.kind == CallKind::Video && self.status == CallStatus::Connected && !self.video_off
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        info!("Call {} with {} ended after {}", self.id, self.peer.name, format_duration(self.elapsed_secs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::channel;

    fn peer() -> CallPeer {
        CallPeer {
            contact_id: Some("1".to_string()),
            name: "Sarah Wilson".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_new_call_is_connecting() {
        let (tx, _rx) = channel();
        let call = CallSession::start(peer(), CallKind::Audio, &tx);

        assert_eq!(call.status(), CallStatus::Connecting);
        assert_eq!(call.status_text(), "Connecting...");
        assert_eq!(call.elapsed_secs(), 0);
        assert!(!call.is_muted());
    }

    #[tokio::test]
    async fn test_events_for_other_calls_are_ignored() {
        let (tx, _rx) = channel();
        let mut call = CallSession::start(peer(), CallKind::Video, &tx);

        let stray = SimEvent::CallStatus { call_id: Uuid::new_v4(), status: CallStatus::Connected };
        assert!(!call.apply(&stray));
        assert_eq!(call.status(), CallStatus::Connecting);
    }

    #[tokio::test]
    async fn test_ticks_only_count_while_connected() {
        let (tx, _rx) = channel();
        let mut call = CallSession::start(peer(), CallKind::Audio, &tx);
        let id = call.id();

        assert!(!call.apply(&SimEvent::CallTick { call_id: id }));
        assert!(call.apply(&SimEvent::CallStatus { call_id: id, status: CallStatus::Connected }));
        // A late ringing event must not move the call backwards
        assert!(!call.apply(&SimEvent::CallStatus { call_id: id, status: CallStatus::Ringing }));

        for _ in 0..65 {
            assert!(call.apply(&SimEvent::CallTick { call_id: id }));
        }
        assert_eq!(call.status_text(), "01:05");
    }

    #[tokio::test]
    async fn test_toggles() {
        let (tx, _rx) = channel();
        let mut audio = CallSession::start(peer(), CallKind::Audio, &tx);
        assert!(audio.toggle_mute());
        assert!(!audio.toggle_mute());
        assert!(!audio.toggle_video(), "Audio calls have no video to turn off");

        let mut video = CallSession::start(peer(), CallKind::Video, &tx);
        let id = video.id();
        video.apply(&SimEvent::CallStatus { call_id: id, status: CallStatus::Connected });
        assert!(video.shows_live_video());
        assert!(video.toggle_video());
        assert!(!video.shows_live_video());
    }
}
