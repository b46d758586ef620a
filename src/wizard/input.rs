// file: src/wizard/input.rs
// version: 1.0.0
// guid: abac4937-37e1-4c70-8c1c-891a7698ae8d

//! Operator input collection.
//!
//! Each field is revalidated on every edit and the owning page's advance
//! gate follows its validity. Invalid input is never reported as a message.

use super::{Page, PageIds};
use crate::steps::StepChain;
use tracing::debug;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// The three operator-entered fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceName,
    ServerHost,
    ServerPort,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::DeviceName => "Device Name",
            Field::ServerHost => "Server Host",
            Field::ServerPort => "Server Port",
        }
    }
}

/// Device name: anything non-empty
pub fn validate_device_name(value: &str) -> bool {
    !value.is_empty()
}

/// What follows the `http://` or `https://` prefix, if the value has one.
pub fn host_remainder(value: &str) -> Option<&str> {
    value
        .strip_prefix(HTTP_SCHEME)
        .or_else(|| value.strip_prefix(HTTPS_SCHEME))
}

/// Server host: an `http://`/`https://` prefix followed by something
pub fn validate_server_host(value: &str) -> bool {
    host_remainder(value).is_some_and(|rest| !rest.is_empty())
}

/// Server port: a non-empty run of ASCII digits
pub fn validate_server_port(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validity of each field after the last edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldValidity {
    pub device_name: bool,
    pub server_host: bool,
    pub server_port: bool,
}

impl FieldValidity {
    pub fn all(&self) -> bool {
        self.device_name && self.server_host && self.server_port
    }
}

/// Holds the operator's answers and drives the input pages' advance gates
#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    device_name: String,
    server_host: String,
    server_port: String,
    validity: FieldValidity,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> &str {
        &self.server_port
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::DeviceName => &self.device_name,
            Field::ServerHost => &self.server_host,
            Field::ServerPort => &self.server_port,
        }
    }

    pub fn validity(&self) -> FieldValidity {
        self.validity
    }

    /// Store `value` for `field`, update the owning page's advance gate and
    /// refresh the summary page. Returns whether the value is valid.
    pub fn set(
        &mut self,
        chain: &mut StepChain<Page>,
        pages: &PageIds,
        field: Field,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let (valid, step) = match field {
            Field::DeviceName => {
                let valid = validate_device_name(&value);
                self.device_name = value;
                self.validity.device_name = valid;
                (valid, pages.device_name)
            }
            Field::ServerHost => {
                let valid = validate_server_host(&value);
                if let Some(rest) = host_remainder(&value) {
                    debug!("Server host remainder: {:?}", rest);
                }
                self.server_host = value;
                self.validity.server_host = valid;
                (valid, pages.server_host)
            }
            Field::ServerPort => {
                let valid = validate_server_port(&value);
                self.server_port = value;
                self.validity.server_port = valid;
                (valid, pages.server_port)
            }
        };

        if !valid {
            debug!("{} rejected", field.label());
        }
        chain.set_advance_gate(step, valid);
        self.refresh_summary(chain, pages);

        valid
    }

    /// Labelled summary of the three fields
    pub fn summary(&self) -> String {
        [Field::DeviceName, Field::ServerHost, Field::ServerPort]
            .iter()
            .map(|field| format!("{}: {}", field.label(), self.value(*field)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn refresh_summary(&self, chain: &mut StepChain<Page>, pages: &PageIds) {
        if let Some(Page::Summary { text }) = chain.content_mut(pages.summary) {
            *text = self.summary();
        }
    }
}
