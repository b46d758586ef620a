// file: src/registration/mod.rs
// version: 1.1.0
// guid: cdb2d150-4ff7-47f9-a7ba-6c41d8570cf1

//! Device registration workflow.
//!
//! Key generation, the registration request, verification polling and the
//! final config write run as one state machine ([`RegistrationWorkflow`]).
//! The workflow is owned by a single task ([`actor`]) and reports progress
//! as [`RunEvent`]s tagged with the run they belong to.

pub mod actor;
pub mod client;
pub mod scheduler;
pub mod workflow;

pub use actor::{spawn_workflow, WorkflowCommand, WorkflowHandle};
pub use client::{HttpRegistrationClient, RegisterOutcome, RegistrationClient, ServerTarget};
pub use scheduler::{Scheduler, TokioScheduler};
pub use workflow::{RegistrationWorkflow, WorkflowSettings};

use crate::config::DeviceConfig;
use crate::error::ErrorKind;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Status texts shown on the registration page
pub mod status {
    pub const STARTING: &str = "Preparing registration...";
    pub const GENERATING_KEYS: &str = "Generating Keys...";
    pub const REGISTERING: &str = "Making Registration Request...";
    pub const AWAITING_VERIFICATION: &str = "Waiting for verification...";
    pub const NAME_TAKEN: &str = "Name already registered, please choose another name";
    pub const UNREACHABLE: &str = "Unable to connect to server, please retype information";
    pub const INVALID_URL: &str = "Invalid URL, please retype information";
    pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server, please retype information";
    pub const KEY_FAILURE: &str = "Unable to create device keys";
    pub const PERSIST_FAILURE: &str = "Unable to save device configuration";
    pub const COMPLETE: &str = "Registration complete";

    pub fn retrying(attempt: u32, max: u32) -> String {
        format!("Unable to connect, retrying ({}/{})...", attempt, max)
    }

    pub fn rejected(status: u16) -> String {
        format!("Server rejected registration (HTTP {}), please retype information", status)
    }
}

/// Identifies one run of the workflow; events from other runs are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a run ended in [`Phase::Failed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 400: the device name is taken
    Conflict,
    /// Retry budget spent on connection failures
    Unreachable,
    /// Host/port do not form a usable URL
    MalformedTarget,
    /// Server answered with a status other than 2xx or 400
    Rejected(u16),
    /// Server answered with a body we could not understand
    UnexpectedResponse,
    /// Key material could not be produced or read back
    Keys,
    /// Verified, but the device config could not be written
    Persist,
}

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    GeneratingKey,
    Registering,
    AwaitingVerification,
    Completed,
    Failed(FailureKind),
}

impl Phase {
    /// Whether the run has stopped on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed(_))
    }
}

/// Per-run bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationAttempt {
    pub retry_count: u32,
    pub phase: Phase,
    pub last_error: Option<ErrorKind>,
}

impl RegistrationAttempt {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What the workflow needs from the operator's answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub device_name: String,
    pub server_host: String,
    pub server_port: String,
}

/// Progress reported by the workflow
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// Replacement text for the registration page
    Status(String),
    /// Open or close the registration page's return gate
    ReturnGate(bool),
    PhaseChanged(Phase),
    /// Config persisted; the registration page may advance
    Completed(DeviceConfig),
}

/// A [`WorkflowEvent`] tagged with its run
#[derive(Debug, Clone, PartialEq)]
pub struct RunEvent {
    pub run: RunId,
    pub event: WorkflowEvent,
}

/// Sending half of a run's event stream
#[derive(Debug, Clone)]
pub struct EventSink {
    run: RunId,
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl EventSink {
    pub fn new(run: RunId, tx: mpsc::UnboundedSender<RunEvent>) -> Self {
        Self { run, tx }
    }

    /// A sink together with the receiver that collects its events
    pub fn channel(run: RunId) -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(run, tx), rx)
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn emit(&self, event: WorkflowEvent) {
        let run = self.run;
        if self.tx.send(RunEvent { run, event }).is_err() {
            debug!("Event receiver for run {} is gone", run);
        }
    }

    pub fn status(&self, text: impl Into<String>) {
        self.emit(WorkflowEvent::Status(text.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Completed.is_terminal());
        assert!(Phase::Failed(FailureKind::Conflict).is_terminal());
        assert!(!Phase::AwaitingVerification.is_terminal());
        assert!(!Phase::Idle.is_terminal());
    }

    #[test]
    fn test_event_sink_tags_events() {
        let run = RunId::new();
        let (sink, mut rx) = EventSink::channel(run);
        sink.status(status::REGISTERING);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.run, run);
        assert_eq!(event.event, WorkflowEvent::Status(status::REGISTERING.to_string()));
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_harmless() {
        let (sink, rx) = EventSink::channel(RunId::new());
        drop(rx);
        sink.emit(WorkflowEvent::ReturnGate(true));
    }
}
