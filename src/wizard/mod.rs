// file: src/wizard/mod.rs
// version: 1.1.0
// guid: 71ce2cf1-560a-477b-9fae-37522da3b731

//! The onboarding wizard: its pages, the operator's answers and the glue
//! between page transitions and the registration workflow.

pub mod input;

pub use input::{Field, FieldValidity, InputCollector};

use crate::config::{DeviceConfig, InputDefaults};
use crate::registration::{Phase, RegistrationRequest, RunEvent, RunId, WorkflowEvent};
use crate::steps::{Direction, StepChain, StepId, Transition};
use tracing::{debug, info};

/// Content of a wizard page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Welcome,
    DeviceName,
    ServerHost,
    ServerPort,
    /// Confirmation page listing the three answers
    Summary { text: String },
    /// Shows the workflow's latest status
    Registration { status: String },
    Finished,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Welcome => "Welcome to AMD-R",
            Page::DeviceName => "Device Name",
            Page::ServerHost => "Server Host",
            Page::ServerPort => "Server Port",
            Page::Summary { .. } => "Confirm",
            Page::Registration { .. } => "Registration",
            Page::Finished => "All Done",
        }
    }

    /// The field this page collects, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            Page::DeviceName => Some(Field::DeviceName),
            Page::ServerHost => Some(Field::ServerHost),
            Page::ServerPort => Some(Field::ServerPort),
            _ => None,
        }
    }
}

/// Ids of every page in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIds {
    pub welcome: StepId,
    pub device_name: StepId,
    pub server_host: StepId,
    pub server_port: StepId,
    pub summary: StepId,
    pub registration: StepId,
    pub finished: StepId,
}

/// Something the frontend must do after a page transition completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    StartRegistration { run: RunId, request: RegistrationRequest },
    CancelRegistration { run: RunId },
}

/// All mutable wizard state: the chain (and its cursor), the operator's
/// answers and the active workflow run.
#[derive(Debug, Clone)]
pub struct WizardState {
    chain: StepChain<Page>,
    inputs: InputCollector,
    pages: PageIds,
    active_run: Option<RunId>,
    phase: Phase,
    device_config: Option<DeviceConfig>,
}

impl WizardState {
    pub fn new() -> Self {
        let mut chain = StepChain::new(Page::Welcome);
        let welcome = chain.head();
        let device_name = chain.append(welcome, Page::DeviceName, true, false);
        let server_host = chain.append(welcome, Page::ServerHost, true, false);
        let server_port = chain.append(welcome, Page::ServerPort, true, false);
        let summary = chain.append(
            welcome,
            Page::Summary {
                text: String::new(),
            },
            true,
            false,
        );
        let registration = chain.append(
            welcome,
            Page::Registration {
                status: String::new(),
            },
            true,
            false,
        );
        let finished = chain.append(welcome, Page::Finished, false, false);

        // Input pages stay closed until their field validates; the
        // registration page opens when the workflow completes.
        chain.set_advance_gate(welcome, true);
        chain.set_advance_gate(summary, true);

        let pages = PageIds {
            welcome,
            device_name,
            server_host,
            server_port,
            summary,
            registration,
            finished,
        };

        let mut state = Self {
            chain,
            inputs: InputCollector::new(),
            pages,
            active_run: None,
            phase: Phase::Idle,
            device_config: None,
        };
        state.refresh_summary();
        state
    }

    /// Build the wizard with fields pre-filled from settings
    pub fn with_defaults(defaults: &InputDefaults) -> Self {
        let mut state = Self::new();
        let prefills = [
            (Field::DeviceName, &defaults.device_name),
            (Field::ServerHost, &defaults.server_host),
            (Field::ServerPort, &defaults.server_port),
        ];
        for (field, value) in prefills {
            if let Some(value) = value {
                state.set_field(field, value.clone());
            }
        }
        state
    }

    pub fn chain(&self) -> &StepChain<Page> {
        &self.chain
    }

    pub fn pages(&self) -> &PageIds {
        &self.pages
    }

    pub fn inputs(&self) -> &InputCollector {
        &self.inputs
    }

    pub fn current_page(&self) -> &Page {
        self.chain.current_step().content()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn device_config(&self) -> Option<&DeviceConfig> {
        self.device_config.as_ref()
    }

    /// Whether the operator has reached the closing page
    pub fn is_finished(&self) -> bool {
        self.chain.current() == self.pages.finished
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.inputs.set(&mut self.chain, &self.pages, field, value)
    }

    pub fn advance(&mut self) -> Option<Transition> {
        let transition = self.chain.advance(self.chain.current());
        if transition.is_none() {
            debug!("Advance blocked on step {}", self.chain.current().index());
        }
        transition
    }

    pub fn go_back(&mut self) -> Option<Transition> {
        let transition = self.chain.go_back(self.chain.current());
        if transition.is_none() {
            debug!("Return blocked on step {}", self.chain.current().index());
        }
        transition
    }

    /// The page transition controller finished animating `transition`.
    ///
    /// Arriving on the registration page starts a new run; leaving it
    /// cancels the active one.
    pub fn transition_finished(&mut self, transition: Transition) -> Option<WizardAction> {
        let registration = self.pages.registration;

        if transition.to == registration && transition.direction == Direction::Forward {
            if self.phase == Phase::Completed {
                return None;
            }

            let run = RunId::new();
            self.active_run = Some(run);
            self.phase = Phase::Idle;
            if let Some(Page::Registration { status }) = self.chain.content_mut(registration) {
                status.clear();
            }
            self.chain.set_return_gate(registration, false);
            self.chain.set_advance_gate(registration, false);
            info!("Starting registration run {}", run);
            return Some(WizardAction::StartRegistration {
                run,
                request: self.registration_request(),
            });
        }

        if transition.from == registration && transition.direction == Direction::Backward {
            if let Some(run) = self.active_run.take() {
                return Some(WizardAction::CancelRegistration { run });
            }
        }

        None
    }

    /// Apply a workflow event. Events from any run but the active one are
    /// dropped.
    pub fn apply(&mut self, event: &RunEvent) -> bool {
        if self.active_run != Some(event.run) {
            debug!("Dropping stale event from run {}", event.run);
            return false;
        }

        let registration = self.pages.registration;
        match &event.event {
            WorkflowEvent::Status(text) => {
                if let Some(Page::Registration { status }) = self.chain.content_mut(registration) {
                    *status = text.clone();
                }
            }
            WorkflowEvent::ReturnGate(enabled) => {
                self.chain.set_return_gate(registration, *enabled);
            }
            WorkflowEvent::PhaseChanged(phase) => {
                self.phase = *phase;
            }
            WorkflowEvent::Completed(config) => {
                self.phase = Phase::Completed;
                self.device_config = Some(config.clone());
                self.chain.set_advance_gate(registration, true);
            }
        }
        true
    }

    /// Cancel whatever run is active, e.g. when the operator quits
    pub fn abandon_run(&mut self) -> Option<WizardAction> {
        self.active_run
            .take()
            .map(|run| WizardAction::CancelRegistration { run })
    }

    pub fn registration_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            device_name: self.inputs.device_name().to_string(),
            server_host: self.inputs.server_host().to_string(),
            server_port: self.inputs.server_port().to_string(),
        }
    }

    fn refresh_summary(&mut self) {
        let text = self.inputs.summary();
        if let Some(Page::Summary { text: summary }) = self.chain.content_mut(self.pages.summary) {
            *summary = text;
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
