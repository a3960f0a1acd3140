//! Multipart parsing and side effects shared by the two submission paths:
//! submitting a pre-registered authorization and self-registering through
//! an event's public link.

use autoriza_core::error::CoreError;
use autoriza_core::validation::{validate_submission_contact, SubmissionContact};
use autoriza_db::models::authorization::{Authorization, SubmissionDetails};
use autoriza_db::models::event::Event;
use autoriza_db::repositories::UserRepo;
use autoriza_events::{Notification, StudentContact};
use axum::extract::Multipart;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::StoredFile;

/// Name of the multipart field carrying the signed document.
pub const FILE_FIELD: &str = "file";

/// An uploaded file still held in memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// All fields a submission form may carry. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub student_name: Option<String>,
    pub student_id_number: Option<String>,
    pub student_email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub file: Option<UploadedFile>,
}

impl SubmissionForm {
    /// Read every field of a multipart body.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = SubmissionForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let filename = field.file_name().unwrap_or("document").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            match name.as_str() {
                "student_name" => form.student_name = Some(value),
                "student_id_number" => form.student_id_number = Some(value),
                "student_email" => form.student_email = Some(value),
                "guardian_name" => form.guardian_name = Some(value),
                "guardian_email" => form.guardian_email = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate the contact fields every submission needs.
    pub fn contact(&self) -> AppResult<SubmissionContact> {
        Ok(validate_submission_contact(
            self.student_email.as_deref().unwrap_or_default(),
            self.guardian_name.as_deref().unwrap_or_default(),
            self.guardian_email.as_deref().unwrap_or_default(),
        )?)
    }

    /// Take the uploaded file, failing if the form had none.
    pub fn take_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest(format!("Missing '{FILE_FIELD}' field")))
    }
}

/// Write the upload to the file store and combine it with the contact fields.
pub async fn store_upload(
    state: &AppState,
    contact: SubmissionContact,
    file: &UploadedFile,
) -> AppResult<SubmissionDetails> {
    let StoredFile {
        reference,
        size,
        mime_type,
    } = state
        .file_store
        .save(&file.filename, file.content_type.as_deref(), &file.bytes)
        .await?;

    Ok(SubmissionDetails {
        student_email: contact.student_email,
        guardian_name: contact.guardian_name,
        guardian_email: contact.guardian_email,
        stored_file_reference: reference,
        original_filename: file.filename.clone(),
        file_size: size as i64,
        file_mime_type: mime_type,
    })
}

/// Commit the database write that owns a freshly stored file.
///
/// If the write fails or matches nothing, the file is removed again so it
/// does not linger without a row pointing at it.
pub async fn commit_with_file<F>(
    state: &AppState,
    details: &SubmissionDetails,
    write: F,
    on_missing: CoreError,
) -> AppResult<Authorization>
where
    F: std::future::Future<Output = Result<Option<Authorization>, sqlx::Error>>,
{
    match write.await {
        Ok(Some(authorization)) => Ok(authorization),
        Ok(None) => {
            state
                .file_store
                .delete_quietly(&details.stored_file_reference)
                .await;
            Err(on_missing.into())
        }
        Err(e) => {
            state
                .file_store
                .delete_quietly(&details.stored_file_reference)
                .await;
            Err(e.into())
        }
    }
}

pub fn student_contact(authorization: &Authorization) -> StudentContact {
    StudentContact {
        student_name: authorization.student_name.clone(),
        student_email: authorization.student_email.clone(),
        guardian_email: authorization.guardian_email.clone(),
    }
}

/// Queue the confirmation to the student side and the alert to the owner.
pub async fn notify_submission(state: &AppState, authorization: &Authorization, event: &Event) {
    state.notifications.publish(Notification::SubmissionConfirmation {
        student: student_contact(authorization),
        event_title: event.title.clone(),
    });

    match UserRepo::find_by_id(&state.pool, event.owner_user_id).await {
        Ok(Some(owner)) => state.notifications.publish(Notification::NewSubmission {
            owner_email: owner.email,
            owner_name: owner.name,
            student_name: authorization.student_name.clone(),
            event_id: event.id,
            event_title: event.title.clone(),
        }),
        Ok(None) => {
            tracing::warn!(event_id = event.id, "Event owner not found, skipping notification");
        }
        Err(e) => {
            tracing::error!(error = %e, event_id = event.id, "Failed to load event owner");
        }
    }
}
