// Status viewer and notification setup tests

mod common;
use common::{advance, new_shell, setup_logging};

use std::sync::Arc;

use murmur::shell::{PermissionState, SidebarTab};
use murmur::sim::{NotificationError, PermissionPrompt};
use murmur::{MockData, Shell};

struct DenyingPrompt;

impl PermissionPrompt for DenyingPrompt {
    fn request(&self) -> Result<(), NotificationError> {
        Err(NotificationError::Denied)
    }
}

#[tokio::test(start_paused = true)]
async fn test_status_progress_and_auto_close() {
    let (mut shell, mut rx) = new_shell();

    assert!(shell.open_status("2"));
    let viewer = shell.status_feed().viewer().expect("viewer should be open");
    assert_eq!(viewer.item().contact, "Sarah Wilson");
    assert_eq!(shell.status_feed().progress(), 0);

    advance(&mut shell, &mut rx, 150).await;
    assert_eq!(shell.status_feed().progress(), 2);

    advance(&mut shell, &mut rx, 1_000).await;
    assert_eq!(shell.status_feed().progress(), 22);

    // 50 ticks fill the bar
    advance(&mut shell, &mut rx, 3_900).await;
    assert_eq!(shell.status_feed().progress(), 100);
    assert!(shell.status_feed().viewer().is_some());

    // The next tick closes the viewer and resets the bar
    advance(&mut shell, &mut rx, 100).await;
    assert!(shell.status_feed().viewer().is_none());
    assert_eq!(shell.status_feed().progress(), 0);

    assert_eq!(advance(&mut shell, &mut rx, 2_000).await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_closing_status_early_stops_ticker() {
    let (mut shell, mut rx) = new_shell();

    shell.open_status("4");
    advance(&mut shell, &mut rx, 450).await;
    shell.close_status();

    assert_eq!(advance(&mut shell, &mut rx, 1_000).await, 0);
    assert_eq!(shell.status_feed().progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reopening_restarts_from_zero() {
    let (mut shell, mut rx) = new_shell();

    shell.sidebar.set_tab(SidebarTab::Status);
    shell.move_cursor(1);
    assert!(shell.activate_highlighted());
    assert_eq!(shell.status_feed().viewer().unwrap().item().contact, "John Davis");

    advance(&mut shell, &mut rx, 550).await;
    assert_eq!(shell.status_feed().progress(), 10);

    assert!(shell.activate_highlighted());
    // Ticks queued by the previous viewer do not count
    assert_eq!(shell.pump(&mut rx), 0);
    assert_eq!(shell.status_feed().progress(), 0);
}

#[tokio::test]
async fn test_status_flags_are_static() {
    let (mut shell, _rx) = new_shell();
    shell.open_status("2");
    shell.close_status();

    let sarah = shell.data().statuses.iter().find(|s| s.id == "2").unwrap();
    assert!(!sarah.viewed);
}

#[tokio::test(start_paused = true)]
async fn test_notification_permission_granted() {
    let (mut shell, mut rx) = new_shell();
    assert_eq!(shell.notifications().state(), PermissionState::Disabled);

    assert!(shell.request_notifications());
    assert!(matches!(shell.notifications().state(), PermissionState::Requesting(_)));
    assert!(!shell.request_notifications(), "Only one request at a time");

    advance(&mut shell, &mut rx, 900).await;
    assert!(!shell.notifications().is_enabled());

    assert_eq!(advance(&mut shell, &mut rx, 200).await, 1);
    assert!(shell.notifications().is_enabled());
    let toast = shell.toast().unwrap();
    assert_eq!(toast.title, "Notifications Enabled!");
    assert!(!toast.destructive);

    assert!(shell.test_notification());
    assert_eq!(shell.toast().unwrap().title, "📱 Sarah Wilson");
    assert!(!shell.request_notifications());
}

#[tokio::test(start_paused = true)]
async fn test_notification_permission_denied() {
    setup_logging();
    let data = MockData::builtin().unwrap();
    let (mut shell, mut rx) = Shell::with_prompt(data, Some("1"), Arc::new(DenyingPrompt));

    shell.request_notifications();
    advance(&mut shell, &mut rx, 1_100).await;

    assert_eq!(shell.notifications().state(), PermissionState::Disabled);
    let toast = shell.toast().unwrap();
    assert_eq!(toast.title, "Permission Denied");
    assert!(toast.destructive);
    assert!(!shell.test_notification());

    // A denied request can be retried
    assert!(shell.request_notifications());
}

#[tokio::test]
async fn test_notification_panel_toggle() {
    let (mut shell, _rx) = new_shell();
    assert!(!shell.is_notification_panel_open());
    shell.set_notification_panel_open(true);
    assert!(shell.is_notification_panel_open());
    shell.set_notification_panel_open(false);
    assert!(!shell.is_notification_panel_open());
}
