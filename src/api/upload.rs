//! Upload endpoint
//!
//! `POST /upload` takes a multipart body with a `file` part (CSV, Excel or
//! JSON) and answers with the full EDA report.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info, warn};

use crate::analysis::EdaReport;
use crate::error::AppError;
use crate::services::{EdaService, UploadService};
use crate::state::SharedState;

/// Analyse an uploaded dataset
pub async fn upload_file(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EdaReport>, AppError> {
    // A request that is not multipart at all carries no file part
    let multipart = multipart.map_err(|e| {
        warn!(error = %e, "Upload request is not multipart");
        AppError::NoFilePart
    })?;

    let upload = UploadService::read_upload(multipart).await?;
    info!(
        filename = %upload.filename,
        format = %upload.format,
        size = upload.bytes.len(),
        "Upload accepted"
    );

    let report = EdaService::analyze(upload, &state.config.analysis).await?;
    Ok(Json(report))
}
