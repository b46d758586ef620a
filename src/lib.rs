// file: src/lib.rs
// version: 3.0.0
// guid: 19cbf78f-6dc5-4c64-942c-5c261be829ce

//! # AMD-R Welcome
//!
//! Guided onboarding for AMD-R devices. The operator walks a chain of pages
//! (device name, server host, server port, confirmation); arriving on the
//! registration page starts a workflow that generates the device key pair,
//! registers the public key with the server, polls until an administrator
//! approves the device and writes the device config.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod registration;
pub mod steps;
pub mod utils;
pub mod wizard;

pub use error::{ErrorKind, Result, WelcomeError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
