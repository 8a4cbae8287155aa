//! Integration tests for SeedFront
//!
//! Each test builds the full router over a seeded temporary database and YAML
//! file and drives it in-process with `tower::ServiceExt::oneshot`.

#[path = "harness.rs"]
mod harness;

#[path = "integration/legacy_api.rs"]
mod legacy_api;
#[path = "integration/pages.rs"]
mod pages;
#[path = "integration/settings_form.rs"]
mod settings_form;
#[path = "integration/v1_api.rs"]
mod v1_api;
