pub mod nominatim;

use async_trait::async_trait;

/// Structured components of a geocoder match. All parts are optional; the
/// address validator fills gaps from caller input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressMatch {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

/// Outcome of a single lookup request. `Unavailable` covers timeouts,
/// transport errors, and malformed responses; callers degrade to
/// pass-through normalization instead of surfacing a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupStatus {
    Match(AddressMatch),
    NoMatch,
    Unavailable,
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> LookupStatus;
}
