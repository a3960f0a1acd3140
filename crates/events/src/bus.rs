//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NotificationBus`] is shared via `Arc<NotificationBus>` in the
//! application state. Publishing never blocks and never fails the caller.

use tokio::sync::broadcast;

use crate::notification::Notification;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus for [`Notification`]s.
///
/// # Usage
///
/// ```rust
/// use autoriza_events::bus::NotificationBus;
/// use autoriza_events::notification::Notification;
/// use autoriza_core::verification::CodePurpose;
///
/// let bus = NotificationBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notification::VerificationCode {
///     email: "prof@example.com".into(),
///     name: "Prof".into(),
///     code: "0420".into(),
///     purpose: CodePurpose::Registration,
/// });
/// ```
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification to all current subscribers.
    ///
    /// With no subscribers (no dispatcher running) the message is dropped.
    pub fn publish(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::StudentContact;

    fn approved() -> Notification {
        Notification::AuthorizationApproved {
            student: StudentContact {
                student_name: "Ana".into(),
                student_email: Some("ana@example.com".into()),
                guardian_email: Some("maria@example.com".into()),
            },
            event_title: "Museum visit".into(),
        }
    }

    #[tokio::test]
    async fn every_subscriber_receives_the_notification() {
        let bus = NotificationBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(approved());

        assert_eq!(rx1.recv().await.unwrap().template(), "authorization_approved");
        assert_eq!(rx2.recv().await.unwrap().template(), "authorization_approved");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        NotificationBus::default().publish(approved());
    }
}
