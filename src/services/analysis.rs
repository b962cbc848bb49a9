//! Analysis service
//!
//! Runs parsing, statistics and chart rendering off the async runtime,
//! bounded by the configured time budget.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::upload::UploadedFile;
use crate::analysis::{build_report, EdaReport};
use crate::config::AnalysisConfig;
use crate::dataset::load_bytes;
use crate::error::AppError;

/// EDA service
pub struct EdaService;

impl EdaService {
    /// Analyse an upload on the blocking pool
    ///
    /// # Arguments
    /// * `upload` - Validated upload
    /// * `config` - Time budget and chart settings
    ///
    /// # Returns
    /// * `Ok(EdaReport)` - Complete report
    /// * `Err(AppError)` - Parse failure, render failure or timeout
    pub async fn analyze(upload: UploadedFile, config: &AnalysisConfig) -> Result<EdaReport, AppError> {
        let timeout_secs = config.timeout_secs;
        let config = config.clone();
        let task = tokio::task::spawn_blocking(move || Self::analyze_blocking(upload, &config));

        match tokio::time::timeout(Duration::from_secs(timeout_secs), task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AppError::Internal(anyhow::anyhow!("Analysis task failed: {}", e))),
            Err(_) => {
                // The blocking task cannot be cancelled; its result is discarded
                warn!(timeout_secs, "Analysis exceeded its time budget");
                Err(AppError::Timeout(timeout_secs))
            }
        }
    }

    /// Parse the payload and build the report on the current thread
    pub fn analyze_blocking(upload: UploadedFile, config: &AnalysisConfig) -> Result<EdaReport, AppError> {
        let start = Instant::now();
        let format = upload.format;

        let table = load_bytes(&upload.bytes, format).map_err(|source| {
            warn!(filename = %upload.filename, %format, error = %source, "Failed to parse upload");
            AppError::UnreadableFile { format, source }
        })?;

        let (rows, columns) = table.shape();
        info!(filename = %upload.filename, %format, rows, columns, "Dataset parsed");

        let report = build_report(upload.filename, &table, config)?;
        info!(
            duration_ms = start.elapsed().as_millis(),
            "Analysis completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetError, FileFormat};
    use axum::body::Bytes;

    fn upload(name: &str, format: FileFormat, body: &'static str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            format,
            bytes: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_analyze_csv() {
        let report = EdaService::analyze(
            upload("data.csv", FileFormat::Csv, "a,b\n1,2\n2,4\n3,7\n"),
            &AnalysisConfig::default(),
        )
        .await
        .expect("Failed to analyse");

        assert_eq!(report.filename, "data.csv");
        assert_eq!(report.shape, (3, 2));
        assert!(report.correlation_plot.is_some());
    }

    #[tokio::test]
    async fn test_analyze_reports_parse_errors() {
        let result = EdaService::analyze(
            upload("bad.json", FileFormat::Json, "{\"not\": \"records\"}"),
            &AnalysisConfig::default(),
        )
        .await;

        match result {
            Err(AppError::UnreadableFile {
                format: FileFormat::Json,
                source: DatasetError::JsonShape(_),
            }) => {}
            other => panic!("Expected UnreadableFile error, got: {:?}", other.map(|r| r.shape)),
        }
    }

    #[tokio::test]
    async fn test_analyze_times_out() {
        let config = AnalysisConfig {
            timeout_secs: 0,
            ..AnalysisConfig::default()
        };
        let result = EdaService::analyze(upload("data.csv", FileFormat::Csv, "a,b\n1,2\n"), &config).await;

        match result {
            Err(AppError::Timeout(0)) => {}
            other => panic!("Expected Timeout error, got: {:?}", other.map(|r| r.shape)),
        }
    }
}
