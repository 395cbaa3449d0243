use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{Error, Result};

/// Which credential variant a session authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Token,
    GlobalKey,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKind::Token => f.write_str("token"),
            AuthKind::GlobalKey => f.write_str("global"),
        }
    }
}

/// How requests authenticate against Cloudflare.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    BearerToken { token: String },
    GlobalKey { email: String, key: String },
}

impl Credentials {
    pub fn bearer_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::invalid_input("API token cannot be empty"));
        }
        Ok(Credentials::BearerToken { token })
    }

    pub fn global_key(email: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let (email, key) = (email.into(), key.into());
        if email.trim().is_empty() {
            return Err(Error::invalid_input("account email cannot be empty"));
        }
        if key.trim().is_empty() {
            return Err(Error::invalid_input("global API key cannot be empty"));
        }
        Ok(Credentials::GlobalKey { email, key })
    }

    pub fn kind(&self) -> AuthKind {
        match self {
            Credentials::BearerToken { .. } => AuthKind::Token,
            Credentials::GlobalKey { .. } => AuthKind::GlobalKey,
        }
    }

    /// Default headers installed on the session's HTTP client.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self {
            Credentials::BearerToken { token } => {
                headers.insert(AUTHORIZATION, secret(&format!("Bearer {token}"))?);
            }
            Credentials::GlobalKey { email, key } => {
                headers.insert(HeaderName::from_static("x-auth-email"), header_value(email)?);
                headers.insert(HeaderName::from_static("x-auth-key"), secret(key)?);
            }
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::invalid_input("credentials contain characters not allowed in headers"))
}

fn secret(value: &str) -> Result<HeaderValue> {
    let mut value = header_value(value)?;
    value.set_sensitive(true);
    Ok(value)
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::BearerToken { .. } => f
                .debug_struct("BearerToken")
                .field("token", &"<redacted>")
                .finish(),
            Credentials::GlobalKey { email, .. } => f
                .debug_struct("GlobalKey")
                .field("email", email)
                .field("key", &"<redacted>")
                .finish(),
        }
    }
}
