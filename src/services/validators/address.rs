use serde::{Deserialize, Serialize};

use crate::models::NormalizedAddress;
use crate::services::geocode::{AddressLookup, AddressMatch, LookupStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressVerdict {
    pub found: bool,
    pub normalized: NormalizedAddress,
    pub suggested_address: String,
    pub message: String,
}

/// Normalizes a US postal address. The geocoder is consulted with
/// progressively relaxed queries; if nothing matches (or the lookup is
/// degraded), caller input passes through unchanged apart from state
/// upper-casing. The result is a *candidate*: the caller stages it for
/// confirmation, it is never committed directly.
pub async fn validate_address(lookup: &dyn AddressLookup, input: &AddressInput) -> AddressVerdict {
    let street = input.street.trim();
    let city = input.city.trim();
    let state = input.state.trim();
    let zip = input.zip_code.trim();

    let zip_ok = zip_shape_ok(zip);

    let candidates = [
        format!("{street}, {city}, {state} {zip}, USA"),
        format!("{street}, {city}, {state}, USA"),
        format!("{city}, {state} {zip}, USA"),
    ];

    let mut matched = None;
    for query in &candidates {
        match lookup.lookup(query).await {
            LookupStatus::Match(m) => {
                matched = Some(m);
                break;
            }
            LookupStatus::NoMatch => continue,
            LookupStatus::Unavailable => {
                tracing::debug!(query, "address lookup degraded, trying next candidate");
                continue;
            }
        }
    }

    let found = matched.is_some();
    let normalized = match matched {
        Some(m) => merge_match(m, street, city, state, zip, input.unit.as_deref()),
        None => NormalizedAddress {
            street: street.to_string(),
            unit: trimmed_unit(input.unit.as_deref()),
            city: city.to_string(),
            state: normalize_state(state, None),
            zip_code: zip.to_string(),
        },
    };

    let suggested_address = normalized.formatted();
    let message = if found && zip_ok {
        format!("I found this address: {suggested_address}. Is this correct?")
    } else {
        format!("I'll use the address you provided: {suggested_address}. Is this correct?")
    };

    AddressVerdict {
        found: found && zip_ok,
        normalized,
        suggested_address,
        message,
    }
}

/// Builds the normalized form from a geocoder match, falling back to caller
/// input for any missing part. A caller-supplied 2-letter state code wins
/// over the geocoder's spelled-out state name.
fn merge_match(
    m: AddressMatch,
    street: &str,
    city: &str,
    state: &str,
    zip: &str,
    unit: Option<&str>,
) -> NormalizedAddress {
    let street_line = match m.road {
        Some(road) => {
            let house = m.house_number.unwrap_or_default();
            format!("{} {}", house.trim(), road.trim())
                .trim()
                .to_string()
        }
        None => street.to_string(),
    };

    NormalizedAddress {
        street: street_line,
        unit: trimmed_unit(unit),
        city: m
            .city
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| city.to_string()),
        state: normalize_state(state, m.state.as_deref()),
        zip_code: m
            .postcode
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| zip.to_string()),
    }
}

fn normalize_state(input_state: &str, lookup_state: Option<&str>) -> String {
    if input_state.len() == 2 {
        input_state.to_uppercase()
    } else {
        lookup_state
            .map(|s| s.to_string())
            .unwrap_or_else(|| input_state.to_string())
    }
}

fn trimmed_unit(unit: Option<&str>) -> Option<String> {
    unit.map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

/// 5 digits, optionally followed by a dash and 4 more.
fn zip_shape_ok(zip: &str) -> bool {
    let bytes = zip.as_bytes();
    match bytes.len() {
        5 => bytes.iter().all(|b| b.is_ascii_digit()),
        10 => {
            bytes[5] == b'-'
                && bytes[..5].iter().all(|b| b.is_ascii_digit())
                && bytes[6..].iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}
