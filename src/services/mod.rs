//! Service layer for business logic
//!
//! Keeps multipart handling and the analysis pipeline out of the HTTP
//! handlers so both can be tested without a router.

pub mod analysis;
pub mod upload;

pub use analysis::EdaService;
pub use upload::{secure_filename, UploadService, UploadedFile};
