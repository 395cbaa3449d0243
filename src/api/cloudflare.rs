use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use log::{debug, error, info, warn};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::{watch, OnceCell};
use tokio::time::{sleep, Instant};

use super::{
    auth::{AuthKind, Credentials},
    client::ZoneApi,
    errors::*,
    models::*,
};
use crate::config::ClientSettings;
use crate::error::{Error, Result};

/// Credentials plus settings. Open a [`Session`] to talk to Cloudflare.
#[derive(Debug, Clone)]
pub struct CloudflareClient {
    credentials: Credentials,
    settings: ClientSettings,
}

impl CloudflareClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            settings: ClientSettings::default(),
        }
    }

    pub fn from_api_token(token: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Credentials::bearer_token(token)?))
    }

    pub fn from_global_key(email: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(Credentials::global_key(email, key)?))
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Opens a session, verifying the credentials first when
    /// `verify_on_open` is set.
    pub async fn open(&self) -> Result<Session> {
        let http = reqwest::Client::builder()
            .default_headers(self.credentials.headers()?)
            .timeout(self.settings.request_timeout)
            .build()?;

        let session = Session {
            http: Some(http),
            auth: self.credentials.kind(),
            settings: self.settings.clone(),
            account_id: OnceCell::new(),
            releases: watch::Sender::new(0),
        };
        info!("HTTP session opened (auth={})", session.auth);

        if self.settings.verify_on_open {
            session.verify_credentials().await?;
        }
        Ok(session)
    }

    /// Runs `f` inside a fresh session and closes it afterwards, whatever `f` returned.
    pub async fn scoped<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s Session) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = self.open().await?;
        let outcome = f(&session).await;
        session.close();
        outcome
    }
}

/// One HTTP connection pool bound to a set of credentials.
///
/// All operations take `&self`, so many may be in flight at once. The pool is
/// released by [`Session::close`] or on drop, whichever happens first.
#[derive(Debug)]
pub struct Session {
    http: Option<reqwest::Client>,
    auth: AuthKind,
    settings: ClientSettings,
    account_id: OnceCell<Option<String>>,
    /// Number of times the pool was released; never exceeds 1.
    releases: watch::Sender<u32>,
}

impl Session {
    /// Releases the connection pool. Returns `false` if it was already released.
    pub fn close(&mut self) -> bool {
        match self.http.take() {
            Some(_) => {
                self.releases.send_modify(|n| *n += 1);
                info!("HTTP session closed");
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Watches how many times the pool has been released, for callers that
    /// outlive the session (e.g. whoever handed it to [`CloudflareClient::scoped`]).
    pub fn subscribe_release(&self) -> watch::Receiver<u32> {
        self.releases.subscribe()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let http = self.http.as_ref().ok_or(Error::SessionClosed)?;
        let url = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        debug!("→ {method} {url}");
        Ok(http.request(method, url))
    }

    async fn envelope(&self, request: RequestBuilder) -> Result<ApiResponse<serde_json::Value>> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("← HTTP {status}: {text}");

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse API response: {e}. Response: {text}");
            Error::Decode(e)
        })
    }

    /// Sends the request and unwraps `result`, mapping a failed envelope to an error.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let envelope = self.envelope(request).await?;

        if !envelope.success {
            let err = map_api_errors(&envelope.errors);
            error!("Cloudflare error: {err}");
            return Err(err);
        }

        let result = envelope.result.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(result)?)
    }

    async fn verify_credentials(&self) -> Result<()> {
        match self.auth {
            AuthKind::Token => self.verify_token().await,
            AuthKind::GlobalKey => {
                let user = self.user().await?;
                info!("Global API key is valid (user={})", user.id);
                Ok(())
            }
        }
    }

    async fn verify_token(&self) -> Result<()> {
        let token: TokenVerification = self
            .execute(self.request(Method::GET, "user/tokens/verify")?)
            .await
            .map_err(reject_credentials)?;
        if token.status != "active" {
            return Err(Error::Api {
                kind: ErrorKind::UserCredsInvalid,
                code: 0,
                message: format!("API token {} is {}", token.id, token.status),
            });
        }
        info!("API token is valid (token={})", token.id);
        Ok(())
    }

    async fn user(&self) -> Result<UserDetails> {
        self.execute(self.request(Method::GET, "user")?)
            .await
            .map_err(reject_credentials)
    }

    /// Account new zones are created under, looked up once per session.
    pub async fn default_account_id(&self) -> Result<Option<String>> {
        let id = self
            .account_id
            .get_or_try_init(|| self.lookup_account_id())
            .await?;
        Ok(id.clone())
    }

    async fn lookup_account_id(&self) -> Result<Option<String>> {
        let user = self.user().await?;
        if let Some(account) = user.account {
            return Ok(Some(account.id));
        }
        if let Some(account) = user.accounts.into_iter().next() {
            return Ok(Some(account.id));
        }

        let accounts: Vec<AccountRef> = self.execute(self.request(Method::GET, "accounts")?).await?;
        Ok(accounts.into_iter().next().map(|a| a.id))
    }

    pub async fn create_zone(&self, name: &str, options: &ZoneOptions) -> Result<Zone> {
        validate_domain_name(name)?;
        let body = CreateZone {
            name,
            jump_start: options.jump_start,
            r#type: options.zone_type,
            account: self.default_account_id().await?.map(|id| AccountRef { id }),
        };

        info!("Creating zone {name}");
        self.execute(self.request(Method::POST, "zones")?.json(&body))
            .await
    }

    /// First zone in the account with exactly this name.
    pub async fn find_zone(&self, name: &str) -> Result<Zone> {
        let zones: Vec<Zone> = self
            .execute(self.request(Method::GET, "zones")?.query(&[("name", name)]))
            .await?;

        zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse(format!("no zone named {name} in account")))
    }

    pub async fn register_domain(&self, name: &str, fail_if_exists: bool) -> Result<RegisteredZone> {
        self.register_domain_with(name, fail_if_exists, &ZoneOptions::default())
            .await
    }

    /// Creates the zone, or with `fail_if_exists == false` falls back to the
    /// zone already in the account.
    pub async fn register_domain_with(
        &self,
        name: &str,
        fail_if_exists: bool,
        options: &ZoneOptions,
    ) -> Result<RegisteredZone> {
        let zone = match self.create_zone(name, options).await {
            Ok(zone) => zone,
            Err(err) if !fail_if_exists && err.kind() == Some(ErrorKind::ZoneAlreadyExists) => {
                warn!("Zone {name} already exists, retrieving its id");
                self.find_zone(name).await?
            }
            Err(err) => return Err(err),
        };

        RegisteredZone::from_zone(zone)
    }

    pub async fn add_dns_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord> {
        if zone_id.trim().is_empty() {
            return Err(Error::invalid_input("zone id cannot be empty"));
        }
        if record.name.trim().is_empty() {
            return Err(Error::invalid_input("record name cannot be empty"));
        }
        if record.content.trim().is_empty() {
            return Err(Error::invalid_input("record content cannot be empty"));
        }

        info!(
            "Adding record {} {} → {}",
            record.r#type, record.name, record.content
        );
        self.execute(
            self.request(Method::POST, &format!("zones/{zone_id}/dns_records"))?
                .json(record),
        )
        .await
    }

    pub async fn zone(&self, zone_id: &str) -> Result<Zone> {
        if zone_id.trim().is_empty() {
            return Err(Error::invalid_input("zone id cannot be empty"));
        }
        self.execute(self.request(Method::GET, &format!("zones/{zone_id}"))?)
            .await
    }

    pub async fn zone_status(&self, zone_id: &str) -> Result<ZoneStatus> {
        Ok(self.zone(zone_id).await?.status)
    }

    /// Polls with the session's default interval and timeout.
    pub async fn wait_until_active(&self, zone_id: &str) -> Result<()> {
        self.wait_until_active_with(
            zone_id,
            self.settings.poll_interval,
            self.settings.activation_timeout,
        )
        .await
    }

    /// Polls the zone status until it reads `active` or `timeout` has passed.
    ///
    /// Dropping the returned future stops polling at the next await point.
    pub async fn wait_until_active_with(
        &self,
        zone_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<()> {
        if poll_interval.is_zero() {
            return Err(Error::invalid_input("poll interval must be greater than 0"));
        }

        info!("Waiting for zone {zone_id} to become active");
        let started = Instant::now();
        // `None` when the timeout is too large to represent: poll until active.
        let deadline = started.checked_add(timeout);

        loop {
            let status = self.zone_status(zone_id).await?;
            if status == ZoneStatus::Active {
                info!("Zone {zone_id} is active");
                return Ok(());
            }
            debug!("Zone {zone_id} status is {status:?}");

            let now = Instant::now();
            let pause = match deadline {
                Some(deadline) if now >= deadline => {
                    return Err(Error::Timeout {
                        zone_id: zone_id.to_string(),
                        waited: now - started,
                    });
                }
                Some(deadline) => poll_interval.min(deadline - now),
                None => poll_interval,
            };
            sleep(pause).await;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
impl ZoneApi for Session {
    async fn register_domain(&self, name: &str, fail_if_exists: bool) -> Result<RegisteredZone> {
        Session::register_domain(self, name, fail_if_exists).await
    }

    async fn add_dns_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord> {
        Session::add_dns_record(self, zone_id, record).await
    }

    async fn zone_status(&self, zone_id: &str) -> Result<ZoneStatus> {
        Session::zone_status(self, zone_id).await
    }

    async fn wait_until_active(&self, zone_id: &str) -> Result<()> {
        Session::wait_until_active(self, zone_id).await
    }
}

/// A rejected credential check is reported as `UserCredsInvalid` unless
/// Cloudflare gave a more specific code.
fn reject_credentials(err: Error) -> Error {
    match err {
        Error::Api {
            kind: ErrorKind::RequestFailed,
            code,
            message,
        } => Error::Api {
            kind: ErrorKind::UserCredsInvalid,
            code,
            message,
        },
        other => other,
    }
}

/// Best-effort check that `name` looks like a registrable DNS name.
fn validate_domain_name(name: &str) -> Result<()> {
    let name = name.strip_suffix('.').unwrap_or(name);
    let invalid = |why: &str| -> Result<()> {
        Err(Error::invalid_input(format!("invalid domain name {name:?}: {why}")))
    };

    if name.is_empty() {
        return invalid("empty");
    }
    if name.len() > 253 {
        return invalid("longer than 253 characters");
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return invalid("needs at least two labels");
    }
    for label in labels {
        if label.is_empty() || label.len() > 63 {
            return invalid("labels must be 1-63 characters");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return invalid("labels cannot start or end with '-'");
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return invalid("only letters, digits and '-' are allowed");
        }
    }
    Ok(())
}
