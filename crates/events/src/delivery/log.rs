//! Mailer used when SMTP is not configured: logs instead of sending.

use async_trait::async_trait;

use super::{MailError, Mailer};
use crate::notification::OutgoingEmail;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            recipients = ?email.recipients,
            subject = %email.subject,
            template = email.template,
            "SMTP not configured, email logged instead of sent"
        );
        Ok(())
    }
}
