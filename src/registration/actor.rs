// file: src/registration/actor.rs
// version: 1.1.0
// guid: 5f0e86b9-3d63-4b0f-8f3c-58c1a9d2e774

//! Task that owns the workflow.
//!
//! The wizard never touches the workflow directly. It sends
//! [`WorkflowCommand`]s and reads [`RunEvent`]s back. Only one run is
//! driven at a time and a start received while one is active is ignored.
//! Cancelling drops the run's future at its next await. Key generation
//! already in flight keeps running and is picked up by the next run.

use super::client::RegistrationClient;
use super::scheduler::Scheduler;
use super::workflow::RegistrationWorkflow;
use super::{EventSink, RegistrationRequest, RunEvent, RunId};
use crate::error::WelcomeError;
use crate::utils::crypto::KeyGenerator;
use crate::wizard::WizardAction;
use crate::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    Start { run: RunId, request: RegistrationRequest },
    Cancel { run: RunId },
}

impl From<WizardAction> for WorkflowCommand {
    fn from(action: WizardAction) -> Self {
        match action {
            WizardAction::StartRegistration { run, request } => WorkflowCommand::Start { run, request },
            WizardAction::CancelRegistration { run } => WorkflowCommand::Cancel { run },
        }
    }
}

/// Wizard-side end of the workflow task
#[derive(Debug)]
pub struct WorkflowHandle {
    commands: mpsc::UnboundedSender<WorkflowCommand>,
    events: mpsc::UnboundedReceiver<RunEvent>,
    task: JoinHandle<()>,
}

impl WorkflowHandle {
    pub fn send(&self, command: WorkflowCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| WelcomeError::system("Registration task has stopped"))
    }

    pub fn dispatch(&self, action: WizardAction) -> Result<()> {
        self.send(action.into())
    }

    pub fn start(&self, run: RunId, request: RegistrationRequest) -> Result<()> {
        self.send(WorkflowCommand::Start { run, request })
    }

    pub fn cancel(&self, run: RunId) -> Result<()> {
        self.send(WorkflowCommand::Cancel { run })
    }

    /// Next event from any run. `None` once the task has stopped.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Stop accepting commands and wait for the task to exit
    pub async fn shutdown(self) -> Result<()> {
        drop(self.commands);
        self.task
            .await
            .map_err(|e| WelcomeError::system(format!("Registration task failed: {}", e)))
    }
}

/// Move `workflow` onto its own task
pub fn spawn_workflow<C, K, S>(workflow: RegistrationWorkflow<C, K, S>) -> WorkflowHandle
where
    C: RegistrationClient + 'static,
    K: KeyGenerator + 'static,
    S: Scheduler + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(drive(workflow, command_rx, event_tx));

    WorkflowHandle {
        commands: command_tx,
        events: event_rx,
        task,
    }
}

async fn drive<C, K, S>(
    mut workflow: RegistrationWorkflow<C, K, S>,
    mut commands: mpsc::UnboundedReceiver<WorkflowCommand>,
    events: mpsc::UnboundedSender<RunEvent>,
) where
    C: RegistrationClient,
    K: KeyGenerator + 'static,
    S: Scheduler,
{
    let mut closed = false;

    while !closed {
        let (run, request) = match commands.recv().await {
            Some(WorkflowCommand::Start { run, request }) => (run, request),
            Some(WorkflowCommand::Cancel { run }) => {
                debug!("Run {} is not active, nothing to cancel", run);
                continue;
            }
            None => break,
        };

        let sink = EventSink::new(run, events.clone());
        let run_future = workflow.run(&request, &sink);
        tokio::pin!(run_future);

        let outcome = loop {
            tokio::select! {
                result = &mut run_future => break Some(result),
                command = commands.recv() => match command {
                    Some(WorkflowCommand::Cancel { run: cancelled }) if cancelled == run => {
                        info!("Registration run {} cancelled", run);
                        break None;
                    }
                    Some(WorkflowCommand::Cancel { run: other }) => {
                        debug!("Ignoring cancel for inactive run {}", other);
                    }
                    Some(WorkflowCommand::Start { run: next, .. }) => {
                        warn!("Run {} is still active, ignoring start of run {}", run, next);
                    }
                    None => {
                        closed = true;
                        break None;
                    }
                },
            }
        };

        match outcome {
            Some(Ok(phase)) => info!("Registration run {} ended in {:?}", run, phase),
            Some(Err(e)) => error!("Registration run {} failed: {}", run, e),
            None => {}
        }
    }

    debug!("Registration task stopped");
}
