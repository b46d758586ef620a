// file: src/main.rs
// version: 2.1.0
// guid: 5ea38bae-0a79-4ef3-b620-0660e270098c

//! AMD-R Welcome - Main entry point

use amdr_welcome::{
    cli::{Cli, Console},
    config::{AppPaths, ConfigWriter, SettingsLoader},
    logging,
    registration::{
        spawn_workflow, HttpRegistrationClient, RegistrationWorkflow, TokioScheduler, WorkflowSettings,
    },
    utils::DeviceKeyGenerator,
    wizard::WizardState,
};
use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose, cli.quiet, cli.log_dir.as_deref())?;
    info!("amdr-welcome {}", amdr_welcome::VERSION);

    let paths = AppPaths::new(&cli.config_dir);
    paths
        .ensure()
        .with_context(|| format!("Cannot create {}", paths.config_dir().display()))?;
    let settings = SettingsLoader::new()
        .load_or_default(paths.settings())
        .context("Failed to load settings")?;

    let client = HttpRegistrationClient::new(&settings.registration)?;
    let workflow = RegistrationWorkflow::new(
        client,
        DeviceKeyGenerator::from_settings(&settings.registration),
        TokioScheduler,
        ConfigWriter::new(paths.clone()),
        WorkflowSettings::from(&settings.registration),
    );
    let mut handle = spawn_workflow(workflow);

    let mut console = Console::new(WizardState::with_defaults(&settings.defaults), std::io::stdout())
        .with_progress(std::io::stderr().is_terminal());
    let stdin = BufReader::new(tokio::io::stdin());

    let (result, interrupted) = tokio::select! {
        result = console.run(stdin, &mut handle) => (result, false),
        _ = signal::ctrl_c() => {
            warn!("Received Ctrl+C, cancelling setup");
            (Ok(()), true)
        }
    };

    if let Some(run) = console.wizard().active_run() {
        handle.cancel(run).ok();
    }
    handle.shutdown().await?;

    if let Some(config) = console.wizard().device_config() {
        info!("Device config written for {}:{}", config.host, config.port);
    }

    if interrupted {
        // A pending stdin read would otherwise hold the runtime open
        std::process::exit(130);
    }
    result
}
