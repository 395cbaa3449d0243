pub mod auth;
pub mod client;
pub mod cloudflare;
pub mod errors;
pub mod models;

pub use auth::{AuthKind, Credentials};
pub use client::ZoneApi;
pub use cloudflare::{CloudflareClient, Session};
pub use errors::ErrorKind;
pub use models::{
    DnsRecord, NewDnsRecord, RecordType, RegisteredZone, Zone, ZoneOptions, ZoneStatus, ZoneType,
};

pub const API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
