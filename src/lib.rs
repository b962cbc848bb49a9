//! EDA Backend Library
//!
//! Upload a CSV, Excel or JSON table and get back summary statistics,
//! descriptive statistics and base64 PNG charts. The binary in
//! `src/main.rs` serves the router built by [`api::router`].

pub mod analysis;
pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod plot;
pub mod services;
/// Application state shared by the handlers
pub mod state;
