// file: src/cli/args.rs
// version: 2.0.0
// guid: 41e7b9c3-0a52-4d86-9f1e-c8d27a6b5e04

//! Command line argument definitions

use crate::config::DEFAULT_CONFIG_DIR;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "amdr-welcome")]
#[command(about = "Set up an AMD-R device and register it with its server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,

    /// Directory holding the device keys, config.yaml and welcome.toml
    #[arg(short, long, env = "AMDR_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Also write logs to a timestamped file in this directory
    #[arg(long, env = "AMDR_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
