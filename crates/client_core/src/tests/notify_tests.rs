use super::*;

fn notifier() -> (Notifier, broadcast::Receiver<ClientEvent>) {
    let (events, rx) = broadcast::channel(64);
    (Notifier::new(events), rx)
}

#[tokio::test(start_paused = true)]
async fn notification_expires_after_default_duration() {
    let (notifier, _rx) = notifier();
    notifier.notify("saved", NotificationKind::Success).await;
    assert_eq!(notifier.active().await.len(), 1);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert_eq!(notifier.active().await.len(), 1);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(notifier.active().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn concurrent_notifications_stack_with_independent_timers() {
    let (notifier, _rx) = notifier();
    notifier
        .notify_for("short", NotificationKind::Info, Duration::from_millis(1000))
        .await;
    notifier
        .notify_for("long", NotificationKind::Warning, Duration::from_millis(5000))
        .await;
    notifier
        .notify_for("short", NotificationKind::Info, Duration::from_millis(1000))
        .await;
    assert_eq!(notifier.active().await.len(), 3);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let remaining = notifier.active().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].message, "long");
    assert_eq!(remaining[0].kind, NotificationKind::Warning);
}

#[tokio::test(start_paused = true)]
async fn expiry_after_manual_dismiss_is_a_no_op() {
    let (notifier, mut rx) = notifier();
    let id = notifier.notify("dismiss me", NotificationKind::Error).await;
    assert!(matches!(
        rx.recv().await.expect("posted"),
        ClientEvent::NotificationPosted(_)
    ));

    assert!(notifier.dismiss(id).await);
    assert!(matches!(
        rx.recv().await.expect("removed"),
        ClientEvent::NotificationRemoved(removed) if removed == id
    ));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(!notifier.dismiss(id).await);
    assert!(rx.try_recv().is_err());
}
