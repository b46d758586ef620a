// file: src/logging/mod.rs
// version: 2.0.0
// guid: 0d7e4f51-2c8a-4b3e-9a61-7f5c2e8d4b90

//! Logging setup for the onboarding wizard

pub mod logger;

pub use logger::{init_logger, log_file_name, with_operation_span};
