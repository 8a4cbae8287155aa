//! SeedFront Web - dashboard pages and JSON API server

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Serves the HTML dashboard, the legacy `/api` endpoints and the enveloped
//! `/api/v1` endpoints over the sync tool's database and YAML configuration.

pub mod cache;
pub mod components;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod pages;
pub mod params;
pub mod server;

pub use server::{AppState, StartupIssue, build_router, run_server};
