mod models;

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use validator::Validate;

pub use models::{ClientOptions, CredentialSettings, Settings};

use crate::api::{CloudflareClient, Credentials};
use crate::error::Error;

/// Runtime settings of a [`CloudflareClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Check the credentials against Cloudflare when a session opens.
    pub verify_on_open: bool,
    pub poll_interval: Duration,
    pub activation_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientOptions::default().into()
    }
}

impl From<ClientOptions> for ClientSettings {
    fn from(opts: ClientOptions) -> Self {
        Self {
            base_url: opts.base_url,
            request_timeout: Duration::from_secs(opts.request_timeout),
            verify_on_open: opts.verify_on_open,
            poll_interval: Duration::from_secs(opts.poll_interval),
            activation_timeout: Duration::from_secs(opts.activation_timeout),
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        Ok(settings)
    }

    pub fn credentials(&self) -> crate::Result<Credentials> {
        let creds = &self.credentials;
        match (&creds.api_token, &creds.email, &creds.global_key) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::invalid_input(
                "specify either api_token or email + global_key, not both",
            )),
            (Some(token), None, None) => Credentials::bearer_token(token.as_str()),
            (None, Some(email), Some(key)) => Credentials::global_key(email.as_str(), key.as_str()),
            _ => Err(Error::invalid_input(
                "need either api_token or an email + global_key pair",
            )),
        }
    }

    pub fn into_client(self) -> crate::Result<CloudflareClient> {
        let credentials = self.credentials()?;
        Ok(CloudflareClient::new(credentials).with_settings(self.client.into()))
    }
}
