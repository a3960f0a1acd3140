//! Upload acceptance rules for signed permission documents.
//!
//! Only PDFs and images are accepted. Stored files get a random name so the
//! original filename never reaches the filesystem.

use uuid::Uuid;

use crate::error::CoreError;

pub const MIME_PDF: &str = "application/pdf";

/// Default maximum upload size: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Longest extension carried over from the original filename.
const MAX_EXTENSION_LENGTH: usize = 10;

/// Accept `application/pdf` and any `image/*` type.
pub fn validate_mime_type(content_type: Option<&str>) -> Result<String, CoreError> {
    let mime = content_type
        .map(|c| c.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .unwrap_or_default();

    let is_image = mime
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty());

    if mime == MIME_PDF || is_image {
        Ok(mime)
    } else {
        Err(CoreError::Validation(
            "Invalid file type. Only PDF and image files are allowed".into(),
        ))
    }
}

pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if size > max_size {
        return Err(CoreError::Validation(format!(
            "File too large. Maximum size is {max_size} bytes"
        )));
    }
    Ok(())
}

/// Lower-cased extension of `filename`, if it is short and alphanumeric.
pub fn safe_extension(filename: &str) -> Option<String> {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = basename.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LENGTH
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// A random, collision-free storage name keeping only a safe extension.
pub fn generate_reference(original_filename: &str) -> String {
    match safe_extension(original_filename) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

/// Whether `reference` looks like something [`generate_reference`] produced.
///
/// Used before touching the filesystem so a tampered value cannot escape the
/// upload directory.
pub fn is_valid_reference(reference: &str) -> bool {
    let (stem, ext) = match reference.split_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (reference, None),
    };
    Uuid::parse_str(stem).is_ok()
        && ext.map_or(true, |e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LENGTH
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_and_images_are_accepted() {
        assert_eq!(validate_mime_type(Some("application/pdf")).unwrap(), "application/pdf");
        assert_eq!(validate_mime_type(Some("image/png")).unwrap(), "image/png");
        assert_eq!(validate_mime_type(Some("IMAGE/JPEG; q=1")).unwrap(), "image/jpeg");
    }

    #[test]
    fn other_types_are_rejected() {
        for mime in ["text/plain", "application/zip", "image/", "", "application/pdfx"] {
            assert!(validate_mime_type(Some(mime)).is_err(), "{mime}");
        }
        assert!(validate_mime_type(None).is_err());
    }

    #[test]
    fn size_limits() {
        assert!(validate_file_size(0, 10).is_err());
        assert!(validate_file_size(10, 10).is_ok());
        assert!(validate_file_size(11, 10).is_err());
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(safe_extension("Permission.PDF"), Some("pdf".into()));
        assert_eq!(safe_extension("../../etc/passwd"), None);
        assert_eq!(safe_extension("archive.tar.gz"), Some("gz".into()));
        assert_eq!(safe_extension(".bashrc"), None);
        assert_eq!(safe_extension("weird.p$f"), None);
    }

    #[test]
    fn reference_never_contains_original_name() {
        let reference = generate_reference("ana-silva-permission.pdf");
        assert!(!reference.contains("ana"));
        assert!(reference.ends_with(".pdf"));
        assert!(is_valid_reference(&reference));
    }

    #[test]
    fn references_are_unique() {
        assert_ne!(generate_reference("a.pdf"), generate_reference("a.pdf"));
    }

    #[test]
    fn tampered_references_are_invalid() {
        assert!(!is_valid_reference("../secret.pdf"));
        assert!(!is_valid_reference("not-a-uuid.pdf"));
        let reference = generate_reference("a.png");
        assert!(!is_valid_reference(&format!("{reference}/..")));
    }
}
