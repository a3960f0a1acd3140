//! Notification bus and email delivery for the authorization backend.
//!
//! - [`NotificationBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Handlers publish after their write commits.
//! - [`Notification`]: the domain messages that trigger an email.
//! - [`NotificationDispatcher`]: background loop that renders each
//!   notification and hands it to a [`Mailer`].
//! - [`delivery`]: the SMTP mailer and the logging fallback.

pub mod bus;
pub mod delivery;
pub mod dispatcher;
pub mod notification;
pub mod templates;

pub use bus::NotificationBus;
pub use delivery::email::{EmailConfig, SmtpMailer};
pub use delivery::log::LogMailer;
pub use delivery::{MailError, Mailer};
pub use dispatcher::NotificationDispatcher;
pub use notification::{Notification, OutgoingEmail, StudentContact};
