//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::str::FromStr;

/// Origins allowed by default (the upload form's dev server)
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upload limits
    pub upload: UploadConfig,
    /// Analysis and rendering settings
    pub analysis: AnalysisConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Origins allowed to call the API from a browser
    pub cors_origins: CorsOrigins,
}

/// Which browser origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`)
    Any,
    /// An explicit list of origins
    List(Vec<String>),
}

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Largest accepted request body, in bytes
    pub max_bytes: usize,
}

/// Analysis configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Time budget for parsing, statistics and rendering (in seconds)
    pub timeout_secs: u64,
    /// Number of bins per histogram
    pub histogram_bins: usize,
    /// Maximum number of bars drawn per categorical chart
    pub max_categories: usize,
    /// Maximum number of numeric columns drawn in the histogram grid
    pub max_histogram_panels: usize,
    /// Maximum number of numeric columns in the correlation matrix
    pub max_correlation_columns: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            histogram_bins: 10,
            max_categories: 50,
            max_histogram_panels: 30,
            max_correlation_columns: 50,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 5000,
                host: "0.0.0.0".to_string(),
                cors_origins: CorsOrigins::parse(DEFAULT_CORS_ORIGINS),
            },
            upload: UploadConfig {
                max_bytes: 16 * 1024 * 1024,
            },
            analysis: AnalysisConfig::default(),
        }
    }
}

impl CorsOrigins {
    /// Parse a comma separated origin list; `*` anywhere means any origin
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                port: env_or("PORT", defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
                cors_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| CorsOrigins::parse(&raw))
                    .unwrap_or(defaults.server.cors_origins),
            },
            upload: UploadConfig {
                max_bytes: env_or("MAX_UPLOAD_BYTES", defaults.upload.max_bytes),
            },
            analysis: AnalysisConfig {
                timeout_secs: env_or("ANALYSIS_TIMEOUT_SECS", defaults.analysis.timeout_secs),
                histogram_bins: env_or("HISTOGRAM_BINS", defaults.analysis.histogram_bins).max(1),
                max_categories: env_or("MAX_CATEGORIES", defaults.analysis.max_categories).max(1),
                max_histogram_panels: env_or(
                    "MAX_HISTOGRAM_PANELS",
                    defaults.analysis.max_histogram_panels,
                )
                .max(1),
                // A matrix needs two columns
                max_correlation_columns: env_or(
                    "MAX_CORRELATION_COLUMNS",
                    defaults.analysis.max_correlation_columns,
                )
                .max(2),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
