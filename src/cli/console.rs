// file: src/cli/console.rs
// version: 1.0.0
// guid: 3c9a7d12-84e6-4f0b-a2d5-6b1e9f47c038

//! Line-oriented terminal frontend for the wizard.
//!
//! Each operator line is one of:
//!
//! | Input          | Effect                                   |
//! |----------------|------------------------------------------|
//! | text           | set the field of the current input page  |
//! | empty line     | advance                                  |
//! | `:back`, `:b`  | go back                                  |
//! | `:quit`, `:q`  | cancel any run and exit                  |
//!
//! Page transitions complete as soon as they are accepted.

use crate::registration::{Phase, WorkflowEvent, WorkflowHandle};
use crate::steps::Transition;
use crate::wizard::{Page, WizardAction, WizardState};
use anyhow::{bail, Context};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// A parsed operator line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Advance,
    Back,
    Quit,
    Text(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Input::Advance,
            ":back" | ":b" => Input::Back,
            ":quit" | ":q" => Input::Quit,
            _ => Input::Text(trimmed.to_string()),
        }
    }
}

/// What handling one line did to the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// The cursor moved; the action, if any, goes to the workflow task
    Moved(Option<WizardAction>),
    /// A field was set; `valid` is its validity
    Updated { valid: bool },
    /// The gate was closed or the input had nowhere to go
    Blocked(String),
    Quit(Option<WizardAction>),
}

pub struct Console<W: Write> {
    wizard: WizardState,
    out: W,
    spinner: Option<ProgressBar>,
    show_progress: bool,
}

impl<W: Write> Console<W> {
    pub fn new(wizard: WizardState, out: W) -> Self {
        Self {
            wizard,
            out,
            spinner: None,
            show_progress: false,
        }
    }

    /// Show an animated spinner on stderr while registering
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn into_wizard(self) -> WizardState {
        self.wizard
    }

    /// Apply one operator line to the wizard
    pub fn handle_line(&mut self, line: &str) -> Reaction {
        match Input::parse(line) {
            Input::Quit => Reaction::Quit(self.wizard.abandon_run()),
            Input::Advance => match self.wizard.advance() {
                Some(transition) => Reaction::Moved(self.finish(transition)),
                None => Reaction::Blocked(self.advance_hint()),
            },
            Input::Back => match self.wizard.go_back() {
                Some(transition) => Reaction::Moved(self.finish(transition)),
                None => Reaction::Blocked("You cannot go back from here".to_string()),
            },
            Input::Text(text) => match self.wizard.current_page().field() {
                Some(field) => Reaction::Updated {
                    valid: self.wizard.set_field(field, text),
                },
                None => Reaction::Blocked("Nothing to enter on this page".to_string()),
            },
        }
    }

    fn finish(&mut self, transition: Transition) -> Option<WizardAction> {
        debug!("Transition {:?}", transition);
        self.wizard.transition_finished(transition)
    }

    fn advance_hint(&self) -> String {
        match self.wizard.current_page() {
            Page::Registration { .. } => "Registration is not finished yet".to_string(),
            page => match page.field() {
                Some(field) => format!("Please enter a valid {}", field.label()),
                None => "You cannot continue from here".to_string(),
            },
        }
    }

    /// Drive the wizard until the operator finishes or quits.
    ///
    /// Operator lines and workflow events are handled as they arrive.
    pub async fn run<R>(&mut self, input: R, workflow: &mut WorkflowHandle) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.render()?;

        while !self.wizard.is_finished() {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read operator input")? else {
                        info!("Input closed, leaving the wizard");
                        if let Some(action) = self.wizard.abandon_run() {
                            workflow.dispatch(action)?;
                        }
                        break;
                    };
                    match self.handle_line(&line) {
                        Reaction::Quit(action) => {
                            if let Some(action) = action {
                                workflow.dispatch(action)?;
                            }
                            self.stop_spinner();
                            writeln!(self.out, "{}", "Setup cancelled".yellow())?;
                            break;
                        }
                        Reaction::Moved(action) => {
                            self.stop_spinner();
                            if let Some(action) = action {
                                workflow.dispatch(action)?;
                            }
                            self.render()?;
                        }
                        Reaction::Updated { valid } => self.render_validity(valid)?,
                        Reaction::Blocked(message) => writeln!(self.out, "{}", message.red())?,
                    }
                }
                event = workflow.next_event() => {
                    let Some(event) = event else {
                        bail!("Registration task stopped unexpectedly");
                    };
                    if self.wizard.apply(&event) {
                        self.render_event(&event.event)?;
                    }
                }
            }
        }

        self.stop_spinner();
        self.out.flush()?;
        Ok(())
    }

    /// Print the current page
    pub fn render(&mut self) -> std::io::Result<()> {
        let step = self.wizard.chain().current_step();
        let page = step.content().clone();
        let (can_advance, can_return) = (step.can_advance(), step.can_return());

        writeln!(self.out)?;
        writeln!(self.out, "{}", page.title().bold().cyan())?;

        match &page {
            Page::Welcome => {
                writeln!(self.out, "This wizard registers this device with its AMD-R server.")?;
            }
            Page::DeviceName | Page::ServerHost | Page::ServerPort => {
                if let Some(field) = page.field() {
                    let value = self.wizard.inputs().value(field);
                    writeln!(self.out, "Enter the {}:", field.label())?;
                    if !value.is_empty() {
                        writeln!(self.out, "  current: {}", value)?;
                    }
                }
            }
            Page::Summary { text } => writeln!(self.out, "{}", text)?,
            Page::Registration { status } => {
                if !status.is_empty() {
                    writeln!(self.out, "{}", status)?;
                }
                self.start_spinner(status);
            }
            Page::Finished => {
                writeln!(self.out, "{}", "Device registered, setup is complete".green())?;
            }
        }

        let mut hints = Vec::new();
        if can_advance {
            hints.push("[Enter] continue");
        }
        if can_return {
            hints.push("[:back] go back");
        }
        hints.push("[:quit] exit");
        writeln!(self.out, "{}", hints.join("  ").dimmed())?;
        self.out.flush()
    }

    fn render_validity(&mut self, valid: bool) -> std::io::Result<()> {
        if valid {
            writeln!(self.out, "{}", "OK, press Enter to continue".green())
        } else {
            let label = self.wizard.current_page().field().map(|f| f.label()).unwrap_or("value");
            writeln!(self.out, "{}", format!("That is not a valid {}", label).red())
        }
    }

    fn render_event(&mut self, event: &WorkflowEvent) -> std::io::Result<()> {
        match event {
            WorkflowEvent::Status(text) => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(text.clone());
                }
                writeln!(self.out, "{}", text)?;
            }
            WorkflowEvent::PhaseChanged(Phase::Failed(_)) => {
                self.stop_spinner();
            }
            WorkflowEvent::ReturnGate(true) => {
                writeln!(self.out, "{}", "[:back] fix your answers and try again".dimmed())?;
            }
            WorkflowEvent::Completed(config) => {
                self.stop_spinner();
                writeln!(
                    self.out,
                    "{}",
                    format!("Registered with {}:{}", config.host, config.port).green()
                )?;
                writeln!(self.out, "{}", "[Enter] continue".dimmed())?;
            }
            WorkflowEvent::PhaseChanged(_) | WorkflowEvent::ReturnGate(false) => {}
        }
        self.out.flush()
    }

    fn start_spinner(&mut self, status: &str) {
        if !self.show_progress || self.wizard.phase().is_terminal() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(status.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
