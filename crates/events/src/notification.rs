//! Domain messages that result in an email, and the rendered email itself.

use autoriza_core::types::DbId;
use autoriza_core::verification::CodePurpose;

use crate::templates;

/// Text used when a rejection carries no reason.
pub const DEFAULT_REJECTION_REASON: &str =
    "Please contact the professor responsible for the event for more details.";

/// The student side of an authorization: who gets told about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentContact {
    pub student_name: String,
    pub student_email: Option<String>,
    pub guardian_email: Option<String>,
}

impl StudentContact {
    fn recipients(&self) -> Vec<String> {
        [&self.student_email, &self.guardian_email]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Something happened that somebody must be emailed about.
#[derive(Debug, Clone)]
pub enum Notification {
    /// A registration or password-reset code was issued.
    VerificationCode {
        email: String,
        name: String,
        code: String,
        purpose: CodePurpose,
    },
    /// Sent to the student and the guardian after a submission.
    SubmissionConfirmation {
        student: StudentContact,
        event_title: String,
    },
    /// Sent to the event owner after a submission.
    NewSubmission {
        owner_email: String,
        owner_name: String,
        student_name: String,
        event_id: DbId,
        event_title: String,
    },
    AuthorizationApproved {
        student: StudentContact,
        event_title: String,
    },
    AuthorizationRejected {
        student: StudentContact,
        event_title: String,
        reason: Option<String>,
    },
}

impl Notification {
    /// Name of the template this notification renders with.
    pub fn template(&self) -> &'static str {
        match self {
            Self::VerificationCode { .. } => templates::VERIFICATION_CODE,
            Self::SubmissionConfirmation { .. } => templates::SUBMISSION_CONFIRMATION,
            Self::NewSubmission { .. } => templates::NEW_SUBMISSION,
            Self::AuthorizationApproved { .. } => templates::AUTHORIZATION_APPROVED,
            Self::AuthorizationRejected { .. } => templates::AUTHORIZATION_REJECTED,
        }
    }

    /// Render the notification into a ready-to-send email.
    pub fn to_email(&self) -> OutgoingEmail {
        let template = self.template();
        match self {
            Self::VerificationCode {
                email,
                name,
                code,
                purpose,
            } => OutgoingEmail {
                subject: match purpose {
                    CodePurpose::Registration => "Your registration verification code".into(),
                    CodePurpose::PasswordReset => "Your password reset code".into(),
                },
                recipients: vec![email.clone()],
                template,
                html_body: templates::verification_code(name, code, *purpose),
            },
            Self::SubmissionConfirmation {
                student,
                event_title,
            } => OutgoingEmail {
                subject: format!("Submission received - Event: {event_title}"),
                recipients: student.recipients(),
                template,
                html_body: templates::submission_confirmation(&student.student_name, event_title),
            },
            Self::NewSubmission {
                owner_email,
                owner_name,
                student_name,
                event_title,
                ..
            } => OutgoingEmail {
                subject: format!("New authorization submitted for event: {event_title}"),
                recipients: vec![owner_email.clone()],
                template,
                html_body: templates::new_submission(owner_name, student_name, event_title),
            },
            Self::AuthorizationApproved {
                student,
                event_title,
            } => OutgoingEmail {
                subject: format!("Authorization APPROVED - Event: {event_title}"),
                recipients: student.recipients(),
                template,
                html_body: templates::authorization_approved(&student.student_name, event_title),
            },
            Self::AuthorizationRejected {
                student,
                event_title,
                reason,
            } => {
                let reason = reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(DEFAULT_REJECTION_REASON);
                OutgoingEmail {
                    subject: format!("Authorization rejected - Event: {event_title}"),
                    recipients: student.recipients(),
                    template,
                    html_body: templates::authorization_rejected(
                        &student.student_name,
                        event_title,
                        reason,
                    ),
                }
            }
        }
    }
}

/// A rendered email handed to a [`Mailer`](crate::delivery::Mailer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub recipients: Vec<String>,
    pub template: &'static str,
    pub html_body: String,
}

impl OutgoingEmail {
    /// Drop blank recipient addresses. Returns `false` if none are left.
    pub fn retain_valid_recipients(&mut self) -> bool {
        self.recipients.retain(|r| !r.trim().is_empty());
        !self.recipients.is_empty()
    }
}
