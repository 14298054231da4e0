#![deny(missing_docs)]

//! Core library for the student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters exposed over HTTP.
pub mod metrics;
/// Student records, validation, and the in-memory store.
pub mod students;
/// Profile summaries produced by an external model runner.
pub mod summary;
