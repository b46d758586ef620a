// file: src/cli/mod.rs
// version: 2.0.0
// guid: 9a2d6e70-5b18-4c3f-8e47-d1f05b3c6a29

//! Command line interface and terminal frontend

pub mod args;
pub mod console;

pub use args::Cli;
pub use console::{Console, Input, Reaction};
