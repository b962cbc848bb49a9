//! Error types and error handling for the HTTP layer
//!
//! Domain errors from parsing and rendering are wrapped in [`AppError`], which
//! converts to a JSON response of the form `{"error": ..., "status": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::dataset::{DatasetError, FileFormat};
use crate::analysis::AnalysisError;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The multipart body has no `file` field
    #[error("No file part")]
    NoFilePart,

    /// The `file` field carries an empty filename
    #[error("No selected file")]
    NoSelectedFile,

    /// Extension outside the allow-list
    #[error("File type not allowed: {0}")]
    FileTypeNotAllowed(String),

    /// Multipart body could not be decoded
    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(String),

    /// Request body exceeds the configured limit
    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// The upload could not be parsed as a table
    #[error("Could not read {format}: {source}")]
    UnreadableFile {
        /// Format the upload claimed to be
        format: FileFormat,
        /// Parser failure
        #[source]
        source: DatasetError,
    },

    /// A statistic or a chart failed
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// Analysis exceeded its time budget (seconds)
    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoFilePart
            | AppError::NoSelectedFile
            | AppError::FileTypeNotAllowed(_)
            | AppError::InvalidMultipart(_)
            | AppError::UnreadableFile { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::Analysis(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::PlotError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn test_no_file_part_response() {
        let (status, body) = body_json(AppError::NoFilePart).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file part");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_unreadable_file_names_format() {
        let err = AppError::UnreadableFile {
            format: FileFormat::Csv,
            source: DatasetError::NoColumns,
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not read CSV: No columns to parse from file");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Timeout(60).status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            AppError::PayloadTooLarge("limit".to_string()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::Analysis(AnalysisError::Plot(PlotError::Render("boom".to_string()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Analysis(AnalysisError::Plot(PlotError::TooLarge {
                width: 1200,
                height: 70_000,
            }))
            .to_string(),
            "Plot generation failed: Figure of 1200x70000 pixels exceeds the 65535 pixel limit"
        );
        assert_eq!(
            AppError::FileTypeNotAllowed("notes.txt".to_string()).to_string(),
            "File type not allowed: notes.txt"
        );
    }
}
