//! HTML bodies for the notification emails.
//!
//! Every interpolated value passes through [`escape_html`].

use autoriza_core::verification::{CodePurpose, CODE_TTL_MINUTES};

pub const VERIFICATION_CODE: &str = "verification_code";
pub const SUBMISSION_CONFIRMATION: &str = "submission_confirmation";
pub const NEW_SUBMISSION: &str = "new_submission";
pub const AUTHORIZATION_APPROVED: &str = "authorization_approved";
pub const AUTHORIZATION_REJECTED: &str = "authorization_rejected";

/// Escape the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(heading: &str, paragraphs: &[String]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        "<!DOCTYPE html><html><body style=\"font-family: sans-serif\">\
         <h2>{}</h2>{body}</body></html>",
        escape_html(heading)
    )
}

pub fn verification_code(name: &str, code: &str, purpose: CodePurpose) -> String {
    let action = match purpose {
        CodePurpose::Registration => "finish creating your account",
        CodePurpose::PasswordReset => "reset your password",
    };
    layout(
        "Verification code",
        &[
            format!("Hello, {}.", escape_html(name)),
            format!("Use the code below to {action}:"),
            format!("<strong style=\"font-size: 24px\">{}</strong>", escape_html(code)),
            format!("The code expires in {CODE_TTL_MINUTES} minutes."),
        ],
    )
}

pub fn submission_confirmation(student_name: &str, event_title: &str) -> String {
    layout(
        "Submission received",
        &[
            format!(
                "The authorization of <strong>{}</strong> for the event <strong>{}</strong> \
                 was received and is waiting for review.",
                escape_html(student_name),
                escape_html(event_title)
            ),
            "You will receive another email once it has been reviewed.".into(),
        ],
    )
}

pub fn new_submission(owner_name: &str, student_name: &str, event_title: &str) -> String {
    layout(
        "New authorization submitted",
        &[
            format!("Hello, {}.", escape_html(owner_name)),
            format!(
                "<strong>{}</strong> submitted an authorization for the event \
                 <strong>{}</strong>. It is ready for your review.",
                escape_html(student_name),
                escape_html(event_title)
            ),
        ],
    )
}

pub fn authorization_approved(student_name: &str, event_title: &str) -> String {
    layout(
        "Authorization approved",
        &[format!(
            "The authorization of <strong>{}</strong> for the event <strong>{}</strong> \
             was approved.",
            escape_html(student_name),
            escape_html(event_title)
        )],
    )
}

pub fn authorization_rejected(student_name: &str, event_title: &str, reason: &str) -> String {
    layout(
        "Authorization rejected",
        &[
            format!(
                "The authorization of <strong>{}</strong> for the event <strong>{}</strong> \
                 was rejected.",
                escape_html(student_name),
                escape_html(event_title)
            ),
            format!("Reason: {}", escape_html(reason)),
        ],
    )
}
