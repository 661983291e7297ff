use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AddressLookup, AddressMatch, LookupStatus};

const USER_AGENT: &str = "frontdesk-scheduling/0.1";

/// OSM Nominatim search client, US-restricted, single best match per query.
pub struct NominatimLookup {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl NominatimLookup {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct Place {
    #[serde(default)]
    address: PlaceAddress,
}

#[derive(Deserialize, Default)]
struct PlaceAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

#[async_trait]
impl AddressLookup for NominatimLookup {
    async fn lookup(&self, query: &str) -> LookupStatus {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
                ("countrycodes", "us"),
            ])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, query, "address lookup request failed");
                return LookupStatus::Unavailable;
            }
        };

        let places: Vec<Place> = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, query, "address lookup returned malformed response");
                return LookupStatus::Unavailable;
            }
        };

        match places.into_iter().next() {
            Some(place) => {
                let addr = place.address;
                LookupStatus::Match(AddressMatch {
                    house_number: addr.house_number,
                    road: addr.road,
                    // Nominatim reports the locality under different keys
                    // depending on place size.
                    city: addr.city.or(addr.town).or(addr.village),
                    state: addr.state,
                    postcode: addr.postcode,
                })
            }
            None => LookupStatus::NoMatch,
        }
    }
}
