use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The `{success, result, errors, messages}` envelope around every v4 response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub code: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_chain: Vec<ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    Initializing,
    Pending,
    Active,
    Moved,
    Deleted,
    Deactivated,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub status: ZoneStatus,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    #[default]
    Full,
    Partial,
    Secondary,
}

/// Extra knobs for zone creation.
#[derive(Debug, Clone, Default)]
pub struct ZoneOptions {
    /// Let Cloudflare scan for existing DNS records.
    pub jump_start: bool,
    pub zone_type: ZoneType,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateZone<'a> {
    pub name: &'a str,
    pub jump_start: bool,
    pub r#type: ZoneType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserDetails {
    pub id: String,
    #[serde(default)]
    pub account: Option<AccountRef>,
    #[serde(default)]
    pub accounts: Vec<AccountRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenVerification {
    pub id: String,
    pub status: String,
}

/// Zone id plus the two name servers the registrar must delegate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredZone {
    pub zone_id: String,
    pub ns1: String,
    pub ns2: String,
}

impl RegisteredZone {
    pub(crate) fn from_zone(zone: Zone) -> Result<Self, Error> {
        let mut ns = zone.name_servers.into_iter();
        match (ns.next(), ns.next()) {
            (Some(ns1), Some(ns2)) => Ok(Self {
                zone_id: zone.id,
                ns1,
                ns2,
            }),
            _ => Err(Error::UnexpectedResponse(format!(
                "Cloudflare did not return two name servers for zone {}",
                zone.name
            ))),
        }
    }
}

impl From<RegisteredZone> for (String, String, String) {
    fn from(z: RegisteredZone) -> Self {
        (z.zone_id, z.ns1, z.ns2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
    Ptr,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
            RecordType::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            "NS" => Ok(RecordType::Ns),
            "SRV" => Ok(RecordType::Srv),
            "CAA" => Ok(RecordType::Caa),
            "PTR" => Ok(RecordType::Ptr),
            other => Err(Error::invalid_input(format!(
                "unsupported DNS record type: {other}"
            ))),
        }
    }
}

/// TTL value Cloudflare treats as "automatic".
pub const AUTO_TTL: u32 = 1;

/// Body of a DNS record creation request.
#[derive(Debug, Clone, Serialize)]
pub struct NewDnsRecord {
    pub r#type: RecordType,
    pub name: String,
    pub content: String,
    pub proxied: bool,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewDnsRecord {
    pub fn new(r#type: RecordType, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            r#type,
            name: name.into(),
            content: content.into(),
            proxied: false,
            ttl: AUTO_TTL,
            priority: None,
            comment: None,
        }
    }

    pub fn proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub r#type: String,
    #[serde(default)]
    pub proxied: bool,
    pub ttl: u32,
    #[serde(default)]
    pub priority: Option<u16>,
    #[serde(default)]
    pub comment: Option<String>,
}
