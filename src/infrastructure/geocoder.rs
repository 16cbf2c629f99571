// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Nominatim reverse-geocoding client.
//!
//! Best effort only: any transport or decode failure is logged and degrades
//! to `None`, so a missing address never fails the surrounding detail view.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::domain::geo::{GeoPoint, ReverseGeocoder};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct NominatimReply {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("gigworks/0.1"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_default();
        Self { client, base_url: base_url.into() }
    }

    async fn fetch(&self, point: GeoPoint) -> Result<Option<String>, reqwest::Error> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, point.latitude, point.longitude
        );
        let reply: NominatimReply = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply.display_name)
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, point: GeoPoint) -> Option<String> {
        match self.fetch(point).await {
            Ok(address) => address,
            Err(err) => {
                tracing::warn!(error = %err, "reverse geocoding failed");
                None
            }
        }
    }
}

/// No-op geocoder for deployments and tests without network access.
pub struct NullGeocoder;

#[async_trait]
impl ReverseGeocoder for NullGeocoder {
    async fn reverse(&self, _point: GeoPoint) -> Option<String> {
        None
    }
}
