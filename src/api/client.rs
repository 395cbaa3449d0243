use super::models::*;
use crate::error::Result;
use async_trait::async_trait;

/// Remote zone operations, so callers can be written against a fake.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    async fn register_domain(&self, name: &str, fail_if_exists: bool) -> Result<RegisteredZone>;
    async fn add_dns_record(&self, zone_id: &str, record: &NewDnsRecord) -> Result<DnsRecord>;
    async fn zone_status(&self, zone_id: &str) -> Result<ZoneStatus>;
    async fn wait_until_active(&self, zone_id: &str) -> Result<()>;
}
