//! End-to-end tests for SeedFront
//!
//! Multi-request workflows against one app, with the response cache enabled
//! where the workflow depends on it.

#[path = "../harness.rs"]
mod harness;

mod cache_workflow;
mod settings_workflow;
