use anyhow::{Context, Result};
use cfzone::{NewDnsRecord, RecordType, Settings, ZoneApi};
use log::info;

// Register the domain, point `www` at the origin, then wait for Cloudflare
// to see the new name servers.
async fn provision(api: &dyn ZoneApi, domain: &str, origin: &str) -> Result<()> {
    let zone = api.register_domain(domain, false).await?;
    info!("Zone ID: {}", zone.zone_id);
    info!("NS1: {}", zone.ns1);
    info!("NS2: {}", zone.ns2);

    let record = NewDnsRecord::new(RecordType::A, "www", origin).proxied(true);
    api.add_dns_record(&zone.zone_id, &record).await?;

    api.wait_until_active(&zone.zone_id).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let domain = args.next().context("usage: provision <domain> [origin-ip] [settings.yaml]")?;
    let origin = args.next().unwrap_or_else(|| "192.0.2.2".to_string());
    let settings_path = args.next().unwrap_or_else(|| "config.yaml".to_string());

    let client = Settings::load(&settings_path)?.into_client()?;
    let mut session = client.open().await?;
    let outcome = provision(&session, &domain, &origin).await;
    session.close();
    outcome
}
