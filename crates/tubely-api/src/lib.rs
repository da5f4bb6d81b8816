//! Tubely API
//!
//! HTTP surface for the asset ingestion pipeline: bearer-token auth, multipart
//! upload handlers, and the upload orchestrator. Exposed as a library so
//! integration tests can drive the real router.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use tubely_core::constants;
