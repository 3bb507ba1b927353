//! Catalog fetch - loads the customer catalog from the dispatch API
//!
//! The catalog is loaded once per session. A fetch or parse failure is
//! non-fatal: it degrades to an empty catalog and the system stays usable
//! for position tracking.

use crate::domain::types::{CustomerRecord, Location, SessionEvent};
use anyhow::Context;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build catalog HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Fetch the full catalog (`GET {base}/api/customers`)
    pub async fn fetch(&self) -> anyhow::Result<Vec<Location>> {
        let url = format!("{}/api/customers", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("catalog request to {url} failed"))?;

        anyhow::ensure!(
            response.status().is_success(),
            "catalog request returned {}",
            response.status()
        );

        let body = response.text().await.context("failed to read catalog response body")?;
        parse_catalog(&body)
    }
}

/// Parse the catalog JSON array into locations
pub fn parse_catalog(body: &str) -> anyhow::Result<Vec<Location>> {
    let records: Vec<CustomerRecord> =
        serde_json::from_str(body).context("catalog response is not a valid customer array")?;
    Ok(records.into_iter().map(Location::from).collect())
}

/// One-shot catalog load task: fetches and delivers `CatalogLoaded`.
///
/// Failure degrades to an empty catalog so selection parsing simply yields
/// empty selections.
pub async fn load_catalog(client: CatalogClient, event_tx: mpsc::Sender<SessionEvent>) {
    let locations = match client.fetch().await {
        Ok(locations) => {
            info!(count = %locations.len(), "catalog_loaded");
            locations
        }
        Err(e) => {
            warn!(error = %e, "catalog_load_failed_using_empty_catalog");
            Vec::new()
        }
    };

    if event_tx.send(SessionEvent::CatalogLoaded(locations)).await.is_err() {
        error!("session_channel_closed_before_catalog_delivery");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CustomerId;

    #[test]
    fn test_parse_catalog() {
        let body = r#"[
            {"id": 1, "name": "Galle Fort Cafe", "contact": "+94 91 111 1111",
             "latitude": 6.0261, "longitude": 80.2168},
            {"id": 2, "name": "Unawatuna Dive Shop", "contact": "+94 91 222 2222",
             "latitude": 6.0108, "longitude": 80.2490}
        ]"#;

        let locations = parse_catalog(body).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, CustomerId(1));
        assert_eq!(locations[1].name, "Unawatuna Dive Shop");
        assert_eq!(locations[1].coordinates.longitude, 80.2490);
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_body() {
        assert!(parse_catalog("not json").is_err());
        assert!(parse_catalog(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_parse_catalog_empty_array() {
        assert!(parse_catalog("[]").unwrap().is_empty());
    }
}
