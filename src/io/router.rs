//! Routing service client (OSRM-compatible HTTP API)
//!
//! The routing engine is opaque to the core: it accepts an ordered list of
//! two or more coordinate pairs and returns a path plus total distance and
//! duration, or a failure. No retry logic lives here; the session decides
//! when to re-request.

use crate::domain::route::RouteSummary;
use crate::domain::types::Coordinates;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: String,
}

pub struct RouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl RouterClient {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build router HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Compute a route through the given waypoints, in order
    pub async fn compute(&self, waypoints: &[Coordinates]) -> anyhow::Result<RouteSummary> {
        anyhow::ensure!(waypoints.len() >= 2, "routing requires at least two waypoints");

        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=polyline",
            self.base_url,
            route_path(waypoints)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("route request to {} failed", self.base_url))?;

        anyhow::ensure!(
            response.status().is_success(),
            "routing service returned {}",
            response.status()
        );

        let body = response.text().await.context("failed to read routing response body")?;
        parse_route_response(&body)
    }
}

/// OSRM coordinate path segment: `lon,lat` pairs joined by `;`
fn route_path(waypoints: &[Coordinates]) -> String {
    waypoints
        .iter()
        .map(|c| format!("{:.6},{:.6}", c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .join(";")
}

fn parse_route_response(body: &str) -> anyhow::Result<RouteSummary> {
    let response: OsrmResponse =
        serde_json::from_str(body).context("routing response is not valid JSON")?;

    anyhow::ensure!(response.code == "Ok", "routing service reported code {}", response.code);

    let route = response
        .routes
        .into_iter()
        .next()
        .context("routing service returned no routes")?;

    Ok(RouteSummary {
        distance_meters: route.distance,
        duration_seconds: route.duration,
        geometry: route.geometry,
    })
}
