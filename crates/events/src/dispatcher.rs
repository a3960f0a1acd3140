//! Background service that turns notifications into emails.
//!
//! [`NotificationDispatcher`] subscribes to the
//! [`NotificationBus`](crate::bus::NotificationBus), renders every received
//! [`Notification`] and sends it on its own task so one slow SMTP exchange
//! never delays the next message. Failures are logged and dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::delivery::Mailer;
use crate::notification::{Notification, OutgoingEmail};

pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Run the dispatch loop until the bus is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<Notification>, mailer: Arc<dyn Mailer>) {
        loop {
            match receiver.recv().await {
                Ok(notification) => {
                    Self::dispatch(&notification, Arc::clone(&mailer));
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged, emails were lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Notification bus closed, dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Render one notification and send it in the background.
    ///
    /// Returns `None` when there was nobody to send it to.
    pub fn dispatch(
        notification: &Notification,
        mailer: Arc<dyn Mailer>,
    ) -> Option<JoinHandle<()>> {
        let mut email = notification.to_email();
        if !email.retain_valid_recipients() {
            tracing::warn!(
                template = email.template,
                subject = %email.subject,
                "No valid recipients, email skipped"
            );
            return None;
        }
        Some(tokio::spawn(async move {
            Self::send(mailer.as_ref(), &email).await;
        }))
    }

    async fn send(mailer: &dyn Mailer, email: &OutgoingEmail) {
        if let Err(e) = mailer.send(email).await {
            tracing::error!(
                error = %e,
                template = email.template,
                recipients = ?email.recipients,
                "Failed to send notification email"
            );
        }
    }
}
