//! Delivery channels for rendered notification emails.
//!
//! [`Mailer`] is the seam the dispatcher talks to. [`email::SmtpMailer`]
//! sends through an SMTP relay; [`log::LogMailer`] only logs and is used
//! when SMTP is not configured.

pub mod email;
pub mod log;

use async_trait::async_trait;

use crate::notification::OutgoingEmail;

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or the sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Sends one rendered email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}
