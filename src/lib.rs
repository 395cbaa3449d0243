//! Async client for the zone, DNS record and activation endpoints of
//! Cloudflare's REST API v4.

pub mod api;
pub mod config;
pub mod error;

pub use api::{
    AuthKind, CloudflareClient, Credentials, DnsRecord, ErrorKind, NewDnsRecord, RecordType,
    RegisteredZone, Session, Zone, ZoneApi, ZoneOptions, ZoneStatus, ZoneType,
};
pub use config::{ClientSettings, Settings};
pub use error::{Error, Result};
