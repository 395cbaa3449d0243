use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::API_BASE_URL;

/// Layout of the YAML settings file.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub credentials: CredentialSettings,

    #[serde(default)]
    #[validate(nested)]
    pub client: ClientOptions,
}

/// Either `api_token`, or `email` together with `global_key`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct CredentialSettings {
    #[validate(length(min = 1, message = "API token cannot be empty"))]
    pub api_token: Option<String>,

    #[validate(length(min = 1, message = "Account email cannot be empty"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Global API key cannot be empty"))]
    pub global_key: Option<String>,
}

/// Client knobs; durations are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientOptions {
    #[validate(length(min = 1, message = "Base URL cannot be empty"))]
    pub base_url: String,

    #[validate(range(min = 1, message = "Request timeout must be greater than 0"))]
    pub request_timeout: u64,

    pub verify_on_open: bool,

    #[validate(range(min = 1, message = "Poll interval must be greater than 0"))]
    pub poll_interval: u64,

    #[validate(range(min = 1, message = "Activation timeout must be greater than 0"))]
    pub activation_timeout: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            request_timeout: 10,
            verify_on_open: true,
            poll_interval: 15,
            activation_timeout: 1800,
        }
    }
}
