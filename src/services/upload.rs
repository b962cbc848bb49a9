//! Upload service
//!
//! Pulls the `file` part out of a multipart request and validates its name
//! against the extension allow-list.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use tracing::{debug, warn};

use crate::dataset::FileFormat;
use crate::error::AppError;

/// Multipart field carrying the dataset
pub const FILE_FIELD: &str = "file";

/// A validated upload, held entirely in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Sanitised filename echoed in the report
    pub filename: String,
    /// Format chosen from the extension
    pub format: FileFormat,
    /// Raw payload
    pub bytes: Bytes,
}

/// Upload service
pub struct UploadService;

impl UploadService {
    /// Read the first `file` part of a multipart body
    ///
    /// # Arguments
    /// * `multipart` - Request body extractor
    ///
    /// # Returns
    /// * `Ok(UploadedFile)` - Payload with a validated name and format
    /// * `Err(AppError)` - Missing part, bad name or malformed body
    pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
        let mut upload: Option<(String, Bytes)> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();

            // Only a part with a filename counts as a file upload
            let file_name = match field.file_name() {
                Some(file_name) if name == FILE_FIELD && upload.is_none() => file_name.to_string(),
                _ => {
                    warn!(field = %name, "Ignoring multipart field");
                    continue;
                }
            };

            let bytes = field.bytes().await.map_err(multipart_error)?;
            debug!(filename = %file_name, size = bytes.len(), "Received file part");
            upload = Some((file_name, bytes));
        }

        let (original, bytes) = upload.ok_or(AppError::NoFilePart)?;
        Self::validate(&original, bytes)
    }

    /// Check the client-supplied filename and pick the parser
    ///
    /// # Arguments
    /// * `original` - Filename as sent by the client
    /// * `bytes` - File contents
    ///
    /// # Returns
    /// * `Ok(UploadedFile)` - Sanitised name, format and payload
    /// * `Err(AppError)` - Empty name or extension outside the allow-list
    pub fn validate(original: &str, bytes: Bytes) -> Result<UploadedFile, AppError> {
        if original.is_empty() {
            return Err(AppError::NoSelectedFile);
        }

        let format = original
            .rsplit_once('.')
            .and_then(|(_, ext)| FileFormat::from_extension(ext))
            .ok_or_else(|| {
                warn!(filename = %original, "Rejected upload with unsupported extension");
                AppError::FileTypeNotAllowed(format!(
                    "{} (allowed: {})",
                    original,
                    FileFormat::ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;

        let mut filename = secure_filename(original);
        if filename.is_empty() {
            filename = format!("upload.{}", format.extension());
        }

        Ok(UploadedFile {
            filename,
            format,
            bytes,
        })
    }
}

/// Reduce a client filename to a safe ASCII name.
///
/// Non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace become `_`, anything outside `[A-Za-z0-9_.-]` is removed and
/// leading/trailing `.` and `_` are stripped. May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidMultipart(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_mluts.txt");
        assert_eq!(secure_filename("  data (final).csv "), "data_final.csv");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn test_validate_accepts_known_extensions() {
        let upload = UploadService::validate("Sales Report.XLSX", Bytes::new()).expect("valid");
        assert_eq!(upload.format, FileFormat::Xlsx);
        assert_eq!(upload.filename, "Sales_Report.XLSX");

        let upload = UploadService::validate("records.json", Bytes::new()).expect("valid");
        assert_eq!(upload.format, FileFormat::Json);
    }

    #[test]
    fn test_validate_empty_filename() {
        match UploadService::validate("", Bytes::new()) {
            Err(AppError::NoSelectedFile) => {}
            other => panic!("Expected NoSelectedFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        for name in ["notes.txt", "csv", "archive.csv.zip"] {
            match UploadService::validate(name, Bytes::new()) {
                Err(AppError::FileTypeNotAllowed(msg)) => assert!(msg.starts_with(name)),
                other => panic!("Expected FileTypeNotAllowed error, got: {:?}", other),
            }
        }
    }

    #[test]
    fn test_validate_non_ascii_stem() {
        let upload = UploadService::validate("\u{6570}\u{636e}.csv", Bytes::new()).expect("valid");
        assert_eq!(upload.filename, "csv");
        assert_eq!(upload.format, FileFormat::Csv);
    }
}
