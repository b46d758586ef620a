// file: src/registration/client.rs
// version: 1.1.0
// guid: 6e227236-0f5c-4114-9c53-f42a18537db0

//! HTTP collaborator for the registration server

use crate::config::{RegistrationSettings, VerificationMethod};
use crate::error::WelcomeError;
use crate::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

pub const REGISTER_PATH: &str = "/api/amd-r/register";
pub const VERIFICATION_PATH: &str = "/api/amd-r/test-verification";

/// Base URL of the registration server, built from the operator's input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    base: Url,
}

impl ServerTarget {
    /// Combine `host` (scheme included) and `port` into a base URL.
    ///
    /// `host` must be a bare origin: scheme and host name, optionally a
    /// trailing slash.
    pub fn parse(host: &str, port: &str) -> Result<Self> {
        let mut base = Url::parse(host)?;

        if base.host_str().map_or(true, str::is_empty) {
            return Err(WelcomeError::malformed_target(format!("No host in {:?}", host)));
        }
        if base.port().is_some() {
            return Err(WelcomeError::malformed_target(format!(
                "Host {:?} already carries a port, enter it in the port field",
                host
            )));
        }
        if !matches!(base.path(), "" | "/") || base.query().is_some() || base.fragment().is_some() {
            return Err(WelcomeError::malformed_target(format!(
                "Host {:?} must not include a path, query or fragment",
                host
            )));
        }
        if !base.username().is_empty() || base.password().is_some() {
            return Err(WelcomeError::malformed_target(format!("Host {:?} must not include credentials", host)));
        }

        let port: u16 = port
            .parse()
            .map_err(|e| WelcomeError::malformed_target(format!("Invalid port {:?}: {}", port, e)))?;
        base.set_port(Some(port))
            .map_err(|_| WelcomeError::malformed_target(format!("Cannot set port on {:?}", host)))?;

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn register_url(&self) -> Result<Url> {
        Ok(self.base.join(REGISTER_PATH)?)
    }

    pub fn verification_url(&self) -> Result<Url> {
        Ok(self.base.join(VERIFICATION_PATH)?)
    }
}

/// How the server answered a registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 2xx: registered, awaiting approval
    Accepted,
    /// 400: the name is already registered
    NameTaken,
    /// Any other status
    Rejected(u16),
}

/// Requests the workflow makes against the server.
///
/// Errors must be classified: connection problems as
/// [`WelcomeError::Transport`], unusable URLs as
/// [`WelcomeError::MalformedTarget`].
#[async_trait::async_trait]
pub trait RegistrationClient: Send + Sync {
    async fn register(&self, target: &ServerTarget, name: &str, public_key: &str) -> Result<RegisterOutcome>;

    /// Whether the device has been approved
    async fn verify(&self, target: &ServerTarget, name: &str) -> Result<bool>;
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct VerificationBody<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    results: bool,
}

/// reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    client: reqwest::Client,
    verification_method: VerificationMethod,
}

impl HttpRegistrationClient {
    pub fn new(settings: &RegistrationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| WelcomeError::system(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            verification_method: settings.verification_method,
        })
    }
}

#[async_trait::async_trait]
impl RegistrationClient for HttpRegistrationClient {
    async fn register(&self, target: &ServerTarget, name: &str, public_key: &str) -> Result<RegisterOutcome> {
        let url = target.register_url()?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&RegisterBody { name, key: public_key })
            .send()
            .await?;

        let status = response.status();
        debug!("Registration answered with {}", status);
        Ok(if status == StatusCode::BAD_REQUEST {
            RegisterOutcome::NameTaken
        } else if status.is_success() {
            RegisterOutcome::Accepted
        } else {
            RegisterOutcome::Rejected(status.as_u16())
        })
    }

    async fn verify(&self, target: &ServerTarget, name: &str) -> Result<bool> {
        let url = target.verification_url()?;
        debug!("{:?} {}", self.verification_method, url);

        let request = match self.verification_method {
            VerificationMethod::Get => self.client.get(url).query(&[("name", name)]),
            VerificationMethod::Post => self.client.post(url).json(&VerificationBody { name }),
        };
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WelcomeError::unexpected_response(format!(
                "Verification answered with status {}",
                status
            )));
        }

        let body: VerificationResponse = response.json().await?;
        Ok(body.results)
    }
}
